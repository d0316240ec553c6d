use crate::api::{
    ApiReceiver, AssessmentResponse, FinalQuestionsResponse, FinalSubmitResponse, SubmitResponse,
};
use crate::embed;
use crate::model::{AppState, QuizKind, QuizResult};
use crate::session::QuizSession;
use crate::storage::{KvStore, ResultCache};
use crate::timer::CountdownTimer;

// Submódulos
pub mod actions;
pub mod completion;
pub mod navigation;
pub mod queries;
pub mod resets;

/// Segundos por pregunta en los quizzes de submódulo, si el backend no
/// manda otro límite
pub const FORMATIVE_QUESTION_SECS: u32 = 30;
/// Presupuesto total del quiz final
pub const FINAL_TOTAL_SECS: u32 = 600;
/// Los quizzes de submódulo muestran como mucho 3 preguntas del banco
pub const MAX_FORMATIVE_QUESTIONS: usize = 3;

/// Epoch en segundos; es el único reloj que consume el resto del código,
/// que siempre lo recibe como parámetro.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

pub struct QuizApp {
    pub cache: ResultCache,
    pub session: QuizSession,
    pub timer: CountdownTimer,
    pub state: AppState,
    pub message: String,
    pub fetch_error: Option<String>,
    pub submit_error: Option<String>,
    pub embedded: bool,
    /// Id de assessment que devuelve el GET y exige el POST formativo
    pub assessment_id: Option<String>,
    pub last_result: Option<QuizResult>,
    pub final_result: Option<QuizResult>,
    pending_questions: Option<ApiReceiver<AssessmentResponse>>,
    pending_submit: Option<ApiReceiver<SubmitResponse>>,
    pending_final_questions: Option<ApiReceiver<FinalQuestionsResponse>>,
    pending_final_submit: Option<ApiReceiver<FinalSubmitResponse>>,
}

impl QuizApp {
    pub fn new(store: Box<dyn KvStore>, user_key: Option<String>, embedded: bool) -> Self {
        let cache = ResultCache::new(store, user_key);
        Self {
            cache,
            session: QuizSession::new(QuizKind::Formative),
            timer: CountdownTimer::new(FORMATIVE_QUESTION_SECS),
            state: AppState::Welcome,
            message: String::new(),
            fetch_error: None,
            submit_error: None,
            embedded,
            assessment_id: None,
            last_result: None,
            final_result: None,
            pending_questions: None,
            pending_submit: None,
            pending_final_questions: None,
            pending_final_submit: None,
        }
    }

    /// Construye la app leyendo usuario y modo embed del entorno real
    /// (query string en wasm, variables de entorno en nativo).
    pub fn from_env() -> Self {
        let mut app = Self::new(default_store(), embed::user_key(), embed::is_embedded());
        // El resultado final sobrevive entre sesiones
        app.final_result = app.cache.get_final();
        app
    }

    pub fn is_network_pending(&self) -> bool {
        self.pending_questions.is_some()
            || self.pending_submit.is_some()
            || self.pending_final_questions.is_some()
            || self.pending_final_submit.is_some()
    }

    /// Suelta los canales de red en vuelo y para el reloj. Se llama al
    /// navegar fuera de un quiz: las respuestas de una sesión abandonada
    /// no deben aplicarse.
    pub(crate) fn descartar_red_pendiente(&mut self) {
        self.pending_questions = None;
        self.pending_submit = None;
        self.pending_final_questions = None;
        self.pending_final_submit = None;
        self.timer.set_active(false);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> Box<dyn KvStore> {
    Box::new(crate::storage::FileStore::new("learncheck_cache.json"))
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> Box<dyn KvStore> {
    Box::new(crate::storage::LocalStore)
}
