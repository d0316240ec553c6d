// src/session.rs
//
// Máquina de estados de un intento de quiz. No toca red ni almacenamiento:
// la app orquesta las peticiones y la caché; aquí solo viven las
// transiciones, el registro de respuestas y el cálculo local del resultado.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{AnswerDetail, Feedback, Question, QuizKind, QuizResult, round_score};

/// Idle → Loading → InProgress → Submitting → {Completed | Failed}.
/// Failed vuelve a InProgress (reenviar) o a Loading (recargar).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    InProgress,
    Submitting,
    Completed,
    Failed,
}

/// Registro de respuestas de la sesión: índice de pregunta → índice de
/// opción, más el conjunto de preguntas bloqueadas.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnswerLedger {
    selected: HashMap<usize, usize>,
    locked: HashSet<usize>,
}

impl AnswerLedger {
    /// Anota una respuesta; si `lock`, la pregunta queda bloqueada.
    /// Devuelve false (sin efecto) si ya estaba bloqueada.
    pub fn record(&mut self, question: usize, option: usize, lock: bool) -> bool {
        if self.locked.contains(&question) {
            return false;
        }
        self.selected.insert(question, option);
        if lock {
            self.locked.insert(question);
        }
        true
    }

    pub fn selected(&self, question: usize) -> Option<usize> {
        self.selected.get(&question).copied()
    }

    pub fn is_locked(&self, question: usize) -> bool {
        self.locked.contains(&question)
    }

    pub fn answered_count(&self) -> usize {
        self.selected.len()
    }

    /// Primera pregunta sin responder, o None si están todas
    pub fn first_unanswered(&self, total: usize) -> Option<usize> {
        (0..total).find(|i| !self.selected.contains_key(i))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.locked.clear();
    }
}

/// Snapshot persistible de una sesión en curso (reanudar tras recarga)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tutorial_id: u32,
    pub current_index: usize,
    pub answers: HashMap<usize, usize>,
    pub locked: HashSet<usize>,
    pub completed: bool,
}

/// Motivo por el que un submit no llega a salir
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitBlock {
    /// Ya hay un envío en vuelo; la llamada se ignora
    AlreadySubmitting,
    /// Quiz final con preguntas sin responder; se salta a la primera
    Incomplete { first_unanswered: usize },
    /// La sesión no está en curso
    NotInProgress,
}

/// Qué hacer cuando vence el temporizador por pregunta
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutAction {
    Advanced,
    SubmitNow,
}

pub struct QuizSession {
    pub kind: QuizKind,
    pub tutorial_id: Option<u32>,
    pub phase: SessionPhase,
    pub questions: Vec<Question>,
    pub ledger: AnswerLedger,
    pub current_index: usize,
    pub is_mock: bool,
    started_at: Option<f64>, // epoch en segundos, para la duración de respaldo
}

impl QuizSession {
    pub fn new(kind: QuizKind) -> Self {
        Self {
            kind,
            tutorial_id: None,
            phase: SessionPhase::Idle,
            questions: Vec::new(),
            ledger: AnswerLedger::default(),
            current_index: 0,
            is_mock: false,
            started_at: None,
        }
    }

    pub fn begin_loading(&mut self, tutorial_id: Option<u32>) {
        self.tutorial_id = tutorial_id;
        self.phase = SessionPhase::Loading;
        self.questions.clear();
        self.ledger.clear();
        self.current_index = 0;
        self.is_mock = false;
        self.started_at = None;
    }

    /// Preguntas cargadas (del backend o del banco mock). Arranca el
    /// sello de tiempo usado como respaldo de la duración.
    pub fn apply_questions(&mut self, questions: Vec<Question>, is_mock: bool, now: f64) {
        self.questions = questions;
        self.ledger.clear();
        self.current_index = 0;
        self.is_mock = is_mock;
        self.started_at = Some(now);
        self.phase = SessionPhase::InProgress;
    }

    pub fn fail_loading(&mut self) {
        self.phase = SessionPhase::Failed;
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.total() > 0 && self.current_index == self.total() - 1
    }

    /// Responde la pregunta actual. En quizzes formativos la primera
    /// selección bloquea (feedback inmediato); en el final se puede
    /// cambiar hasta el envío. Devuelve false si estaba bloqueada.
    pub fn select_answer(&mut self, option: usize) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        let q = self.current_index;
        let in_range = self
            .questions
            .get(q)
            .map(|question| option < question.choices.len())
            .unwrap_or(false);
        if !in_range {
            return false;
        }
        let lock = self.kind == QuizKind::Formative;
        self.ledger.record(q, option, lock)
    }

    /// Avanza una pregunta; nunca pasa del final ni da la vuelta
    pub fn advance(&mut self) {
        if self.total() == 0 {
            return;
        }
        self.current_index = (self.current_index + 1).min(self.total() - 1);
    }

    pub fn retreat(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn go_to(&mut self, index: usize) {
        if index < self.total() {
            self.current_index = index;
        }
    }

    /// Segundos transcurridos desde la carga; respaldo de la duración
    /// cuando el backend no la informa. Nunca negativo.
    pub fn elapsed_secs(&self, now: f64) -> u64 {
        match self.started_at {
            Some(start) if now > start => (now - start).round() as u64,
            _ => 0,
        }
    }

    /// Intenta pasar a Submitting. `force` (vencimiento del temporizador
    /// global) salta la validación de completitud del quiz final.
    pub fn try_begin_submit(&mut self, force: bool) -> Result<(), SubmitBlock> {
        if self.phase == SessionPhase::Submitting {
            return Err(SubmitBlock::AlreadySubmitting);
        }
        if self.phase != SessionPhase::InProgress {
            return Err(SubmitBlock::NotInProgress);
        }
        if self.kind == QuizKind::Summative && !force {
            if let Some(first) = self.ledger.first_unanswered(self.total()) {
                // No se envían respuestas parciales en el examen final
                self.current_index = first;
                return Err(SubmitBlock::Incomplete { first_unanswered: first });
            }
        }
        self.phase = SessionPhase::Submitting;
        Ok(())
    }

    /// El envío falló: la sesión vuelve a estar en curso y es reanudable
    pub fn fail_submit(&mut self) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::InProgress;
        }
    }

    pub fn complete(&mut self) {
        self.phase = SessionPhase::Completed;
    }

    /// Vencimiento del temporizador por pregunta: autoavanza, o pide el
    /// envío si era la última. La pregunta sin respuesta cuenta como
    /// incorrecta, sin opción seleccionada.
    pub fn on_question_timeout(&mut self) -> TimeoutAction {
        if self.is_last_question() {
            TimeoutAction::SubmitNow
        } else {
            self.advance();
            TimeoutAction::Advanced
        }
    }

    /// Pares (id de pregunta, ¿acierto?) para el POST del quiz de
    /// submódulo; la corrección se calcula en cliente porque el banco
    /// formativo trae las opciones marcadas.
    pub fn formative_payload(&self) -> Vec<(String, bool)> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), self.is_answer_correct(i)))
            .collect()
    }

    /// Pares (id de pregunta, opción elegida en clave "1".."4") para el
    /// POST del quiz final; el servidor corrige.
    pub fn summative_payload(&self) -> Vec<(String, String)> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let key = self
                    .ledger
                    .selected(i)
                    .map(|opt| (opt + 1).to_string())
                    .unwrap_or_default();
                (q.id.clone(), key)
            })
            .collect()
    }

    fn is_answer_correct(&self, index: usize) -> bool {
        let (q, sel) = match (self.questions.get(index), self.ledger.selected(index)) {
            (Some(q), Some(sel)) => (q, sel),
            _ => return false,
        };
        q.choices
            .get(sel)
            .and_then(|c| c.correct)
            .unwrap_or(false)
    }

    /// Detalle por pregunta recalculado en local, para el modo mock y
    /// como respaldo cuando el servidor no devuelve el suyo.
    pub fn local_detail(&self) -> Vec<AnswerDetail> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = self.ledger.selected(i).and_then(|s| q.choices.get(s));
                let correct_choice = q.correct_choice().and_then(|c| q.choices.get(c));
                AnswerDetail {
                    question_id: q.id.clone(),
                    tutorial_id: q.tutorial_id,
                    correct: self.is_answer_correct(i),
                    user_answer: selected.map(|c| c.text.clone()).unwrap_or_default(),
                    answer: correct_choice.map(|c| c.text.clone()).unwrap_or_default(),
                    explanation: selected
                        .and_then(|c| c.explanation.clone())
                        .or_else(|| correct_choice.and_then(|c| c.explanation.clone()))
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Resultado calculado íntegramente en cliente (modo mock, o envío
    /// forzado sin datos del servidor).
    pub fn local_result(&self, now: f64, feedback: Option<Feedback>) -> QuizResult {
        let detail = self.local_detail();
        let correct = detail.iter().filter(|d| d.correct).count() as u32;
        let total = self.total() as u32;
        QuizResult {
            score: round_score(correct, total),
            correct,
            total,
            duration_secs: self.elapsed_secs(now),
            detail,
            questions: self.questions.clone(),
            feedback,
            is_mock: self.is_mock,
        }
    }

    /// Snapshot persistible para reanudar tras una recarga accidental
    pub fn snapshot(&self, completed: bool) -> Option<SessionSnapshot> {
        Some(SessionSnapshot {
            tutorial_id: self.tutorial_id?,
            current_index: self.current_index,
            answers: self.ledger.selected.clone(),
            locked: self.ledger.locked.clone(),
            completed,
        })
    }

    /// Reaplica un snapshot sobre las preguntas ya cargadas
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        self.ledger.selected = snapshot
            .answers
            .iter()
            .filter(|(q, _)| **q < self.total())
            .map(|(q, o)| (*q, *o))
            .collect();
        self.ledger.locked = snapshot
            .locked
            .iter()
            .copied()
            .filter(|q| *q < self.total())
            .collect();
        if snapshot.current_index < self.total() {
            self.current_index = snapshot.current_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Choice;

    fn two_choice_question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Pregunta {id}"),
            choices: vec![
                Choice {
                    id: 1,
                    text: "A".into(),
                    correct: Some(false),
                    explanation: None,
                },
                Choice {
                    id: 2,
                    text: "B".into(),
                    correct: Some(true),
                    explanation: Some("B es la buena".into()),
                },
            ],
            tutorial_id: None,
            time_limit_secs: Some(30),
        }
    }

    fn formative_session(n: usize) -> QuizSession {
        let mut s = QuizSession::new(QuizKind::Formative);
        s.begin_loading(Some(35368));
        let qs = (0..n).map(|i| two_choice_question(&format!("q{i}"))).collect();
        s.apply_questions(qs, false, 1000.0);
        s
    }

    fn summative_session(n: usize) -> QuizSession {
        let mut s = QuizSession::new(QuizKind::Summative);
        s.begin_loading(None);
        let qs = (0..n).map(|i| two_choice_question(&format!("q{i}"))).collect();
        s.apply_questions(qs, false, 1000.0);
        s
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut s = formative_session(3);
        s.retreat();
        assert_eq!(s.current_index, 0);
        for _ in 0..10 {
            s.advance();
        }
        assert_eq!(s.current_index, 2);
        s.go_to(99);
        assert_eq!(s.current_index, 2);
    }

    #[test]
    fn formative_answer_locks_on_first_selection() {
        let mut s = formative_session(2);
        assert!(s.select_answer(0));
        assert!(s.ledger.is_locked(0));
        // Cambiar una respuesta bloqueada no tiene efecto
        assert!(!s.select_answer(1));
        assert_eq!(s.ledger.selected(0), Some(0));
    }

    #[test]
    fn summative_answers_stay_editable() {
        let mut s = summative_session(2);
        assert!(s.select_answer(0));
        assert!(s.select_answer(1));
        assert_eq!(s.ledger.selected(0), Some(1));
        assert!(!s.ledger.is_locked(0));
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut s = formative_session(1);
        assert!(!s.select_answer(5));
        assert_eq!(s.ledger.answered_count(), 0);
    }

    #[test]
    fn submit_is_guarded_against_reentry() {
        let mut s = formative_session(1);
        s.select_answer(1);
        assert!(s.try_begin_submit(false).is_ok());
        assert_eq!(
            s.try_begin_submit(false),
            Err(SubmitBlock::AlreadySubmitting)
        );
    }

    #[test]
    fn summative_submit_requires_all_answers() {
        let mut s = summative_session(2);
        s.select_answer(1); // solo la pregunta 0
        assert_eq!(
            s.try_begin_submit(false),
            Err(SubmitBlock::Incomplete { first_unanswered: 1 })
        );
        // Salta a la primera sin responder y sigue en curso
        assert_eq!(s.current_index, 1);
        assert_eq!(s.phase, SessionPhase::InProgress);
    }

    #[test]
    fn forced_submit_skips_completeness_check() {
        let mut s = summative_session(2);
        s.select_answer(1);
        assert!(s.try_begin_submit(true).is_ok());
        assert_eq!(s.phase, SessionPhase::Submitting);
    }

    #[test]
    fn formative_submit_allows_unanswered() {
        let mut s = formative_session(3);
        s.select_answer(1);
        assert!(s.try_begin_submit(false).is_ok());
    }

    #[test]
    fn failed_submit_returns_to_in_progress() {
        let mut s = formative_session(1);
        s.select_answer(1);
        s.try_begin_submit(false).unwrap();
        s.fail_submit();
        assert_eq!(s.phase, SessionPhase::InProgress);
        // Y se puede reintentar
        assert!(s.try_begin_submit(false).is_ok());
    }

    #[test]
    fn local_result_scores_two_of_three() {
        // B,B,A con B correcta → 2/3, 66.67
        let mut s = formative_session(3);
        s.select_answer(1);
        s.advance();
        s.select_answer(1);
        s.advance();
        s.select_answer(0);
        let r = s.local_result(1010.0, None);
        assert_eq!(r.correct, 2);
        assert_eq!(r.total, 3);
        assert_eq!(r.score, 66.67);
        assert_eq!(r.duration_secs, 10);
    }

    #[test]
    fn unanswered_question_counts_as_incorrect() {
        let mut s = formative_session(2);
        s.select_answer(1);
        let r = s.local_result(1001.0, None);
        assert_eq!(r.correct, 1);
        assert!(!r.detail[1].correct);
        assert!(r.detail[1].user_answer.is_empty());
    }

    #[test]
    fn question_timeout_advances_or_submits() {
        let mut s = formative_session(2);
        assert_eq!(s.on_question_timeout(), TimeoutAction::Advanced);
        assert_eq!(s.current_index, 1);
        assert_eq!(s.on_question_timeout(), TimeoutAction::SubmitNow);
    }

    #[test]
    fn summative_payload_uses_one_based_option_keys() {
        let mut s = summative_session(2);
        s.select_answer(1);
        let payload = s.summative_payload();
        assert_eq!(payload[0], ("q0".to_string(), "2".to_string()));
        assert_eq!(payload[1], ("q1".to_string(), String::new()));
    }

    #[test]
    fn elapsed_never_negative() {
        let s = formative_session(1);
        assert_eq!(s.elapsed_secs(0.0), 0);
    }

    #[test]
    fn snapshot_round_trip_restores_position_and_answers() {
        let mut s = formative_session(3);
        s.select_answer(1);
        s.advance();
        let snap = s.snapshot(false).unwrap();

        let mut other = formative_session(3);
        other.restore(&snap);
        assert_eq!(other.current_index, 1);
        assert_eq!(other.ledger.selected(0), Some(1));
        assert!(other.ledger.is_locked(0));
    }
}
