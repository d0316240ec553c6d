use serde::{Deserialize, Serialize};

/// Tipo de quiz: formativo (por submódulo, feedback inmediato) o
/// sumativo (quiz final del módulo, se corrige al enviar todo).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuizKind {
    Formative,
    Summative,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: u32,
    pub text: String, // Texto de la opción
    #[serde(default)]
    pub correct: Option<bool>, // None cuando el servidor no lo expone (quiz final)
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub prompt: String, // Enunciado
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub tutorial_id: Option<u32>, // Submódulo de origen (quiz final)
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
}

impl Question {
    /// Índice de la opción correcta, si el banco la trae marcada
    pub fn correct_choice(&self) -> Option<usize> {
        self.choices
            .iter()
            .position(|c| c.correct.unwrap_or(false))
    }
}

/// Detalle por pregunta dentro de un resultado ya corregido
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerDetail {
    pub question_id: String,
    #[serde(default)]
    pub tutorial_id: Option<u32>,
    pub correct: bool,
    pub user_answer: String,
    pub answer: String, // Texto de la opción correcta
    pub explanation: String,
}

/// Texto de acompañamiento del resultado (resumen + consejo)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feedback {
    pub summary: String,
    pub advice: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub score: f64, // 0–100, redondeado a 2 decimales
    pub correct: u32,
    pub total: u32,
    pub duration_secs: u64,
    pub detail: Vec<AnswerDetail>,
    pub questions: Vec<Question>, // Snapshot del banco usado en la sesión
    #[serde(default)]
    pub feedback: Option<Feedback>,
    #[serde(default)]
    pub is_mock: bool,
}

/// Proyección por submódulo para el dashboard; se sobreescribe con el
/// último intento y solo acumula el contador de intentos.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmoduleResult {
    pub id: u32,
    pub name: String,
    pub score: f64,
    pub correct: u32,
    pub total: u32,
    pub duration_secs: u64,
    pub attempts: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    QuizIntro,
    Quiz,
    QuizResults,
    FinalIntro,
    FinalQuiz,
    FinalResults,
    Dashboard,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Welcome
    }
}

/// score = round(correct/total × 100, 2 decimales); 0 si no hay preguntas
pub fn round_score(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = correct as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_compare_inside_results() {
        // QuizResult se compara entero (caché, tests); sus preguntas
        // anidadas también tienen que poder compararse
        let q = Question {
            id: "q1".into(),
            prompt: "Pregunta".into(),
            choices: vec![Choice {
                id: 1,
                text: "A".into(),
                correct: Some(true),
                explanation: None,
            }],
            tutorial_id: Some(35368),
            time_limit_secs: Some(30),
        };
        assert_eq!(q.clone(), q);
    }

    #[test]
    fn round_score_two_decimals() {
        assert_eq!(round_score(2, 3), 66.67);
        assert_eq!(round_score(1, 3), 33.33);
        assert_eq!(round_score(3, 3), 100.0);
    }

    #[test]
    fn round_score_empty_is_zero() {
        assert_eq!(round_score(0, 0), 0.0);
    }
}
