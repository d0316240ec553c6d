// src/api.rs
//
// Cliente REST del backend de evaluación. En nativo usa reqwest bloqueante
// en un hilo de trabajo; en wasm usa fetch vía spawn_local. En ambos casos
// el resultado llega por un canal mpsc que la app sondea en cada frame.

use std::collections::HashMap;
use std::sync::mpsc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{AnswerDetail, Choice, Feedback, Question};

#[cfg(target_arch = "wasm32")]
const DEFAULT_ENDPOINT: &str = "/api";
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_NATIVE_ENDPOINT: &str = "https://api.learncheck.example";

#[cfg(not(target_arch = "wasm32"))]
pub fn api_base_url() -> String {
    std::env::var("LEARNCHECK_API_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NATIVE_ENDPOINT.to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn api_base_url() -> String {
    option_env!("LEARNCHECK_API_URL")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

#[derive(Debug, Clone)]
pub enum ApiError {
    Network(String),
    Http { status: u16, body: String },
    InvalidJson(String),
}

impl ApiError {
    /// Mensaje apto para mostrar en la interfaz
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(e) => format!("No se pudo conectar con el servidor: {e}"),
            ApiError::Http { status, .. } => {
                format!("El servidor respondió con un error (HTTP {status}).")
            }
            ApiError::InvalidJson(e) => format!("Respuesta inválida del servidor: {e}"),
        }
    }
}

// ---------- DTOs de entrada ----------

#[derive(Debug, Default, Deserialize)]
pub struct AssessmentResponse {
    #[serde(default)]
    pub data: Vec<WireQuestion>,
    #[serde(default)]
    pub assessment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub id: u32,
    #[serde(rename = "option")]
    pub text: String,
    #[serde(default)]
    pub correct: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireQuestion {
    pub id: Value, // el backend alterna entre ids numéricos y de texto
    #[serde(default)]
    pub assessment: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub multiple_choice: Vec<WireChoice>,
    #[serde(default)]
    pub tutorial_id: Option<u32>,
    #[serde(default)]
    pub time: Option<u64>, // límite por pregunta en milisegundos
}

impl WireQuestion {
    pub fn into_question(self) -> Question {
        Question {
            id: id_to_string(&self.id),
            prompt: self.assessment.or(self.question).unwrap_or_default(),
            choices: self
                .multiple_choice
                .into_iter()
                .map(|c| Choice {
                    id: c.id,
                    text: c.text,
                    correct: c.correct,
                    explanation: c.explanation,
                })
                .collect(),
            tutorial_id: self.tutorial_id,
            time_limit_secs: self.time.map(|ms| (ms / 1000) as u32),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, alias = "benar")]
    pub correct: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub duration: Option<Value>, // número de segundos o texto libre
    #[serde(default, alias = "lama_mengerjakan")]
    pub duration_text: Option<String>,
    #[serde(default)]
    pub detail: Option<Vec<WireDetail>>,
    #[serde(default)]
    pub answers: Option<Vec<WireDetail>>,
    #[serde(default)]
    pub feedback: Option<WireFeedback>,
}

impl SubmitResponse {
    /// Detalle del servidor, venga en `detail` o en `answers`
    pub fn take_detail(&mut self) -> Option<Vec<AnswerDetail>> {
        self.detail
            .take()
            .or_else(|| self.answers.take())
            .map(|d| d.into_iter().map(WireDetail::into_detail).collect())
    }
}

#[derive(Debug, Deserialize)]
pub struct WireDetail {
    #[serde(alias = "soal_id")]
    pub question_id: Value,
    #[serde(default)]
    pub tutorial_id: Option<u32>,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl WireDetail {
    pub fn into_detail(self) -> AnswerDetail {
        AnswerDetail {
            question_id: id_to_string(&self.question_id),
            tutorial_id: self.tutorial_id,
            correct: self.correct,
            user_answer: self.user_answer,
            answer: self.answer,
            explanation: self.explanation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireFeedback {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, alias = "recommendation")]
    pub advice: Option<String>,
}

impl WireFeedback {
    pub fn into_feedback(self) -> Feedback {
        Feedback {
            summary: self.summary.unwrap_or_default(),
            advice: self.advice.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FinalQuestionsResponse {
    #[serde(default)]
    pub data: Vec<FinalWireQuestion>,
}

/// El quiz final llega con las opciones en columnas y sin marcar la
/// correcta: lo corrige el servidor.
#[derive(Debug, Deserialize)]
pub struct FinalWireQuestion {
    pub id: Value,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub option_1: String,
    #[serde(default)]
    pub option_2: String,
    #[serde(default)]
    pub option_3: String,
    #[serde(default)]
    pub option_4: String,
    #[serde(default)]
    pub tutorial_id: Option<u32>,
}

impl FinalWireQuestion {
    pub fn into_question(self) -> Question {
        let options = [self.option_1, self.option_2, self.option_3, self.option_4];
        Question {
            id: id_to_string(&self.id),
            prompt: self.assessment,
            choices: options
                .into_iter()
                .enumerate()
                .map(|(i, text)| Choice {
                    id: i as u32 + 1,
                    text,
                    correct: None,
                    explanation: None,
                })
                .collect(),
            tutorial_id: self.tutorial_id,
            time_limit_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FinalSubmitResponse {
    #[serde(default)]
    pub results: Vec<FinalResultRow>,
}

#[derive(Debug, Deserialize)]
pub struct FinalResultRow {
    pub question_id: Value,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: HashMap<String, String>, // claves "1".."4"
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub is_true: bool,
    #[serde(default, alias = "explanation_user")]
    pub explanation: String,
    #[serde(default)]
    pub tutorial_id: Option<u32>,
}

impl FinalResultRow {
    /// Detalle corregido; los textos de las opciones se resuelven desde
    /// el mapa `options` con la clave cruda como respaldo.
    pub fn to_detail(&self, tutorial_id: Option<u32>) -> AnswerDetail {
        AnswerDetail {
            question_id: id_to_string(&self.question_id),
            tutorial_id: tutorial_id.or(self.tutorial_id),
            correct: self.is_true,
            user_answer: self
                .options
                .get(&self.user_answer)
                .cloned()
                .unwrap_or_else(|| self.user_answer.clone()),
            answer: self
                .options
                .get(&self.correct_answer)
                .cloned()
                .unwrap_or_else(|| self.correct_answer.clone()),
            explanation: self.explanation.clone(),
        }
    }

    /// Reconstruye la pregunta con la opción correcta ya marcada, para
    /// el snapshot del resultado final.
    pub fn to_question(&self, tutorial_id: Option<u32>) -> Question {
        Question {
            id: id_to_string(&self.question_id),
            prompt: self.question.clone(),
            choices: ["1", "2", "3", "4"]
                .iter()
                .map(|key| Choice {
                    id: key.parse().unwrap_or(0),
                    text: self.options.get(*key).cloned().unwrap_or_default(),
                    correct: Some(self.correct_answer == *key),
                    explanation: None,
                })
                .collect(),
            tutorial_id: tutorial_id.or(self.tutorial_id),
            time_limit_secs: None,
        }
    }
}

// ---------- DTOs de salida ----------

#[derive(Debug, Serialize)]
pub struct FormativeAnswer {
    pub question_id: String,
    pub correct: bool, // el banco formativo se corrige en cliente
}

#[derive(Debug, Serialize)]
pub struct FinalAnswer {
    pub question_id: String,
    pub answer: String, // clave de opción "1".."4"
}

#[derive(Serialize)]
struct AnswersEnvelope<T: Serialize> {
    answers: Vec<T>,
}

/// Convierte un id del backend (número o texto) a clave estable
pub fn id_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Duración informada por el backend: número de segundos positivo, o
/// los dígitos de un texto tipo "42 segundos". None si no hay nada útil.
pub fn parse_duration_secs(duration: Option<&Value>, text: Option<&str>) -> Option<u64> {
    if let Some(v) = duration {
        if let Some(n) = v.as_u64() {
            if n > 0 {
                return Some(n);
            }
        }
        if let Some(s) = v.as_str() {
            if let Some(n) = digits_of(s) {
                return Some(n);
            }
        }
    }
    text.and_then(digits_of)
}

fn digits_of(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|n| *n > 0)
}

// ---------- Transporte ----------

pub type ApiReceiver<T> = mpsc::Receiver<Result<T, ApiError>>;

enum Method {
    Get,
    Post,
}

fn decode<T: DeserializeOwned>(raw: Result<String, ApiError>) -> Result<T, ApiError> {
    raw.and_then(|text| {
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidJson(e.to_string()))
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn request_blocking(method: Method, url: &str, body: Option<String>) -> Result<String, ApiError> {
    let client = reqwest::blocking::Client::new();
    let builder = match method {
        Method::Get => client.get(url),
        Method::Post => client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.unwrap_or_default()),
    };
    let response = builder
        .send()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_request<T>(method: Method, url: String, body: Option<String>) -> ApiReceiver<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(decode(request_blocking(method, &url, body)));
    });
    rx
}

#[cfg(target_arch = "wasm32")]
async fn request_fetch(method: Method, url: &str, body: Option<String>) -> Result<String, ApiError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let opts = RequestInit::new();
    opts.set_mode(RequestMode::Cors);
    match method {
        Method::Get => opts.set_method("GET"),
        Method::Post => {
            opts.set_method("POST");
            opts.set_body(&JsValue::from_str(&body.unwrap_or_default()));
        }
    }

    let window = web_sys::window()
        .ok_or_else(|| ApiError::Network("No existe window en entorno WASM.".into()))?;

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    let response: Response = resp_value
        .dyn_into()
        .map_err(|_| ApiError::Network("La respuesta fetch no es un Response válido.".into()))?;

    let text_promise = response
        .text()
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| ApiError::Network(format!("{e:?}")))?
        .as_string()
        .ok_or_else(|| ApiError::Network("response.text() no devolvió texto".into()))?;

    if !response.ok() {
        return Err(ApiError::Http {
            status: response.status(),
            body: text,
        });
    }
    Ok(text)
}

#[cfg(target_arch = "wasm32")]
fn spawn_request<T>(method: Method, url: String, body: Option<String>) -> ApiReceiver<T>
where
    T: DeserializeOwned + 'static,
{
    let (tx, rx) = mpsc::channel();
    wasm_bindgen_futures::spawn_local(async move {
        let _ = tx.send(decode(request_fetch(method, &url, body).await));
    });
    rx
}

// ---------- Operaciones ----------

/// GET del banco de preguntas de un submódulo. En modo embed se usa el
/// endpoint público sin autenticación.
pub fn fetch_assessment(tutorial_id: u32, embedded: bool) -> ApiReceiver<AssessmentResponse> {
    let base = api_base_url();
    let url = if embedded {
        format!("{base}/iframe/tutorial/{tutorial_id}")
    } else {
        format!("{base}/assessment/tutorial/{tutorial_id}")
    };
    spawn_request(Method::Get, url, None)
}

/// POST de respuestas del quiz de submódulo
pub fn submit_assessment(
    tutorial_id: u32,
    assessment_id: &str,
    answers: Vec<FormativeAnswer>,
) -> ApiReceiver<SubmitResponse> {
    // Los ids de assessment llegan a veces con prefijo "assessment:NNN"
    let clean_id = assessment_id
        .rsplit_once(':')
        .map(|(_, id)| id)
        .unwrap_or(assessment_id);
    let url = format!(
        "{}/submit/tutorial/{tutorial_id}/assessment/{clean_id}",
        api_base_url()
    );
    let body = serde_json::to_string(&AnswersEnvelope { answers }).unwrap_or_default();
    spawn_request(Method::Post, url, Some(body))
}

pub fn fetch_final_questions() -> ApiReceiver<FinalQuestionsResponse> {
    let url = format!("{}/questions-final", api_base_url());
    spawn_request(Method::Get, url, None)
}

pub fn submit_final(answers: Vec<FinalAnswer>) -> ApiReceiver<FinalSubmitResponse> {
    let url = format!("{}/submit-answers", api_base_url());
    let body = serde_json::to_string(&AnswersEnvelope { answers }).unwrap_or_default();
    spawn_request(Method::Post, url, Some(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_duration_prefers_positive_number() {
        assert_eq!(parse_duration_secs(Some(&json!(42)), None), Some(42));
        assert_eq!(parse_duration_secs(Some(&json!(0)), Some("30 segundos")), Some(30));
        assert_eq!(parse_duration_secs(None, Some("1 minuto 05")), Some(105));
        assert_eq!(parse_duration_secs(None, Some("sin datos")), None);
        assert_eq!(parse_duration_secs(None, None), None);
    }

    #[test]
    fn wire_question_maps_to_model() {
        let raw = json!({
            "id": 7,
            "assessment": "¿Qué es un modelo?",
            "multiple_choice": [
                { "id": 1, "option": "A", "correct": true, "explanation": "sí" },
                { "id": 2, "option": "B" }
            ],
            "tutorial_id": 35368,
            "time": 30000
        });
        let q: WireQuestion = serde_json::from_value(raw).unwrap();
        let q = q.into_question();
        assert_eq!(q.id, "7");
        assert_eq!(q.time_limit_secs, Some(30));
        assert_eq!(q.correct_choice(), Some(0));
        assert_eq!(q.choices[1].correct, None);
    }

    #[test]
    fn submit_response_detail_falls_back_to_answers_field() {
        let raw = json!({
            "success": true,
            "score": 66.67,
            "benar": 2,
            "total": 3,
            "answers": [
                { "soal_id": "q1", "correct": true, "user_answer": "B", "answer": "B" }
            ]
        });
        let mut resp: SubmitResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.correct, Some(2));
        let detail = resp.take_detail().unwrap();
        assert_eq!(detail.len(), 1);
        assert_eq!(detail[0].question_id, "q1");
        assert!(detail[0].correct);
    }

    #[test]
    fn final_row_resolves_option_texts() {
        let raw = json!({
            "question_id": 12,
            "question": "¿Etapa inicial?",
            "options": { "1": "Recolectar", "2": "Entrenar", "3": "Ejecutar", "4": "Transformar" },
            "user_answer": "2",
            "correct_answer": "1",
            "is_true": false,
            "explanation_user": "El flujo empieza por los datos."
        });
        let row: FinalResultRow = serde_json::from_value(raw).unwrap();
        let d = row.to_detail(Some(35378));
        assert_eq!(d.user_answer, "Entrenar");
        assert_eq!(d.answer, "Recolectar");
        assert_eq!(d.tutorial_id, Some(35378));
        assert!(!d.correct);

        let q = row.to_question(Some(35378));
        assert_eq!(q.correct_choice(), Some(0));
        assert_eq!(q.choices.len(), 4);
    }

    #[test]
    fn final_wire_question_has_no_correct_flags() {
        let raw = json!({
            "id": "f1",
            "assessment": "Pregunta",
            "option_1": "A", "option_2": "B", "option_3": "C", "option_4": "D",
            "tutorial_id": 35363
        });
        let q: FinalWireQuestion = serde_json::from_value(raw).unwrap();
        let q = q.into_question();
        assert_eq!(q.correct_choice(), None);
        assert_eq!(q.tutorial_id, Some(35363));
    }
}
