use super::*;
use crate::api::{self, FinalAnswer, FormativeAnswer, WireQuestion};
use crate::data::read_mock_questions;
use crate::model::Question;
use crate::session::{SessionPhase, SubmitBlock, TimeoutAction};

impl QuizApp {
    /// Bombea los canales de red y el temporizador; la UI lo llama en
    /// cada frame.
    pub fn tick(&mut self, now: f64) {
        self.poll_network(now);
        if self.session.phase == SessionPhase::InProgress && self.timer.tick(now) {
            self.on_time_up(now);
        }
    }

    /// Lanza la carga del quiz del submódulo ya seleccionado
    pub fn empezar_quiz(&mut self) {
        let tid = match self.session.tutorial_id {
            Some(t) => t,
            None => return,
        };
        self.fetch_error = None;
        self.submit_error = None;
        self.message = "⏳ Cargando preguntas...".into();
        self.session.begin_loading(Some(tid));
        self.pending_questions = Some(api::fetch_assessment(tid, self.embedded));
        self.state = AppState::Quiz;
    }

    pub fn empezar_quiz_final(&mut self) {
        self.fetch_error = None;
        self.submit_error = None;
        self.message = "⏳ Cargando el quiz final...".into();
        self.session = QuizSession::new(QuizKind::Summative);
        self.session.begin_loading(None);
        self.pending_final_questions = Some(api::fetch_final_questions());
        self.state = AppState::FinalQuiz;
    }

    pub fn poll_network(&mut self, now: f64) {
        // 1) Banco de preguntas del submódulo
        let maybe = self
            .pending_questions
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        if let Some(result) = maybe {
            self.pending_questions = None;
            if self.state != AppState::Quiz {
                // El usuario abandonó la sesión: la respuesta se descarta
                log::debug!("respuesta tardía del banco descartada");
            } else {
                match result {
                    Ok(resp) if !resp.data.is_empty() => {
                        self.assessment_id = resp.assessment_id;
                        let questions: Vec<Question> = resp
                            .data
                            .into_iter()
                            .take(MAX_FORMATIVE_QUESTIONS)
                            .map(WireQuestion::into_question)
                            .collect();
                        self.session.apply_questions(questions, false, now);
                        self.reanudar_snapshot();
                        self.arrancar_temporizador_pregunta();
                        self.message.clear();
                    }
                    Ok(_) => self.cargar_banco_mock(now),
                    Err(e) => {
                        log::warn!("Fallo al cargar el banco: {}", e.user_message());
                        self.cargar_banco_mock(now);
                    }
                }
            }
        }

        // 2) Preguntas del quiz final (aquí no hay banco de respaldo)
        let maybe = self
            .pending_final_questions
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        if let Some(result) = maybe {
            self.pending_final_questions = None;
            if self.state != AppState::FinalQuiz {
                log::debug!("respuesta tardía del quiz final descartada");
            } else {
                match result {
                    Ok(resp) if !resp.data.is_empty() => {
                        let questions: Vec<Question> = resp
                            .data
                            .into_iter()
                            .map(|q| q.into_question())
                            .collect();
                        self.session.apply_questions(questions, false, now);
                        self.timer.reset(FINAL_TOTAL_SECS);
                        self.message.clear();
                    }
                    Ok(_) => {
                        self.session.fail_loading();
                        self.fetch_error =
                            Some("El quiz final no está disponible en este momento.".into());
                    }
                    Err(e) => {
                        self.session.fail_loading();
                        self.fetch_error = Some(e.user_message());
                    }
                }
            }
        }

        // 3) Corrección del quiz de submódulo
        let maybe = self
            .pending_submit
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        if let Some(result) = maybe {
            self.pending_submit = None;
            if self.state != AppState::Quiz {
                log::debug!("corrección tardía del submódulo descartada");
            } else {
                match result {
                    Ok(resp) => self.aplicar_resultado_formativo(resp, now),
                    Err(e) => {
                        self.session.fail_submit();
                        self.submit_error = Some(e.user_message());
                        self.reanudar_temporizador_tras_fallo();
                    }
                }
            }
        }

        // 4) Corrección del quiz final
        let maybe = self
            .pending_final_submit
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        if let Some(result) = maybe {
            self.pending_final_submit = None;
            if self.state != AppState::FinalQuiz {
                log::debug!("corrección tardía del quiz final descartada");
            } else {
                match result {
                    Ok(resp) => self.aplicar_resultado_final(resp, now),
                    Err(e) => {
                        self.session.fail_submit();
                        self.submit_error = Some(e.user_message());
                        self.reanudar_temporizador_tras_fallo();
                    }
                }
            }
        }
    }

    /// El envío falló y la sesión vuelve a estar en curso: el reloj
    /// vuelve a correr, salvo que ya estuviera agotado (envío forzado)
    /// o que la pregunta actual del formativo ya esté respondida.
    fn reanudar_temporizador_tras_fallo(&mut self) {
        if self.timer.remaining_secs() == 0 {
            return;
        }
        if self.session.kind == QuizKind::Formative
            && self
                .session
                .ledger
                .selected(self.session.current_index)
                .is_some()
        {
            return;
        }
        self.timer.set_active(true);
    }

    /// Sin red o banco vacío: se carga el banco mock embebido y el quiz
    /// sigue funcionando en local.
    fn cargar_banco_mock(&mut self, now: f64) {
        let mut questions = read_mock_questions();
        questions.truncate(MAX_FORMATIVE_QUESTIONS);
        self.session.apply_questions(questions, true, now);
        self.reanudar_snapshot();
        self.arrancar_temporizador_pregunta();
        self.message = "⚠ Sin conexión con el servidor: practicas con preguntas de ejemplo.".into();
    }

    fn reanudar_snapshot(&mut self) {
        if let Some(tid) = self.session.tutorial_id {
            if let Some(snap) = self.cache.get_snapshot(tid) {
                self.session.restore(&snap);
            }
        }
    }

    fn guardar_snapshot(&mut self) {
        if self.session.kind != QuizKind::Formative {
            return;
        }
        if let (Some(tid), Some(snap)) = (self.session.tutorial_id, self.session.snapshot(false)) {
            self.cache.put_snapshot(tid, &snap);
        }
    }

    /// Reinicia la cuenta atrás para la pregunta actual del quiz de
    /// submódulo; si ya está respondida, el tiempo no corre.
    pub(super) fn arrancar_temporizador_pregunta(&mut self) {
        let secs = self
            .session
            .current_question()
            .and_then(|q| q.time_limit_secs)
            .unwrap_or(FORMATIVE_QUESTION_SECS);
        self.timer.reset(secs);
        if self.session.ledger.selected(self.session.current_index).is_some() {
            self.timer.set_active(false);
        }
    }

    pub fn seleccionar_respuesta(&mut self, option: usize) {
        if !self.session.select_answer(option) {
            return;
        }
        // En el formativo la selección bloquea y para el reloj de la pregunta
        if self.session.kind == QuizKind::Formative {
            self.timer.set_active(false);
        }
        self.guardar_snapshot();
    }

    pub fn avanzar_pregunta(&mut self) {
        self.session.advance();
        if self.session.kind == QuizKind::Formative {
            self.arrancar_temporizador_pregunta();
        }
        self.guardar_snapshot();
    }

    pub fn retroceder_pregunta(&mut self) {
        self.session.retreat();
        self.guardar_snapshot();
    }

    pub fn ir_a_pregunta(&mut self, index: usize) {
        self.session.go_to(index);
        self.guardar_snapshot();
    }

    /// Intenta enviar las respuestas. `force` salta la validación de
    /// completitud del final (solo cuando vence el tiempo global).
    pub fn enviar_respuestas(&mut self, force: bool, now: f64) {
        match self.session.try_begin_submit(force) {
            Ok(()) => {
                self.submit_error = None;
                self.timer.set_active(false);
                if self.session.is_mock {
                    // En modo mock no hay servidor al que enviar
                    self.aplicar_resultado_mock(now);
                    return;
                }
                match self.session.kind {
                    QuizKind::Formative => {
                        let answers: Vec<FormativeAnswer> = self
                            .session
                            .formative_payload()
                            .into_iter()
                            .map(|(question_id, correct)| FormativeAnswer {
                                question_id,
                                correct,
                            })
                            .collect();
                        let tid = self.session.tutorial_id.unwrap_or_default();
                        let aid = self.assessment_id.clone().unwrap_or_default();
                        self.pending_submit = Some(api::submit_assessment(tid, &aid, answers));
                    }
                    QuizKind::Summative => {
                        let answers: Vec<FinalAnswer> = self
                            .session
                            .summative_payload()
                            .into_iter()
                            .map(|(question_id, answer)| FinalAnswer {
                                question_id,
                                answer,
                            })
                            .collect();
                        self.pending_final_submit = Some(api::submit_final(answers));
                    }
                }
                self.message = "⏳ Enviando respuestas...".into();
            }
            Err(SubmitBlock::Incomplete { first_unanswered }) => {
                self.message = format!(
                    "⚠ Responde todas las preguntas antes de enviar. Te falta la {}.",
                    first_unanswered + 1
                );
            }
            Err(SubmitBlock::AlreadySubmitting) | Err(SubmitBlock::NotInProgress) => {}
        }
    }

    /// Venció el temporizador: en el formativo pasa a la siguiente
    /// pregunta (la actual queda como fallo); en el final fuerza el envío.
    pub fn on_time_up(&mut self, now: f64) {
        match self.session.kind {
            QuizKind::Formative => match self.session.on_question_timeout() {
                TimeoutAction::Advanced => {
                    self.guardar_snapshot();
                    self.arrancar_temporizador_pregunta();
                    self.message = "⏰ Tiempo agotado; pasamos a la siguiente pregunta.".into();
                }
                TimeoutAction::SubmitNow => self.enviar_respuestas(true, now),
            },
            QuizKind::Summative => {
                self.message = "⏰ Tiempo agotado; se envía lo que llevas marcado.".into();
                self.enviar_respuestas(true, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, AssessmentResponse};
    use crate::model::{Choice, Question};
    use crate::session::SessionPhase;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::mpsc;

    fn app() -> QuizApp {
        QuizApp::new(Box::new(MemoryStore::new()), Some("u1".into()), false)
    }

    fn respuesta_banco() -> AssessmentResponse {
        serde_json::from_value(json!({
            "assessment_id": "assessment:7",
            "data": [{
                "id": 1,
                "assessment": "¿Qué es un modelo?",
                "multiple_choice": [
                    { "id": 1, "option": "A", "correct": true },
                    { "id": 2, "option": "B" }
                ],
                "time": 30000
            }]
        }))
        .unwrap()
    }

    fn pregunta(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Pregunta {id}"),
            choices: vec![
                Choice {
                    id: 1,
                    text: "A".into(),
                    correct: None,
                    explanation: None,
                },
                Choice {
                    id: 2,
                    text: "B".into(),
                    correct: None,
                    explanation: None,
                },
            ],
            tutorial_id: None,
            time_limit_secs: None,
        }
    }

    #[test]
    fn navigation_discards_in_flight_requests() {
        let mut app = app();
        let (_tx, rx) = mpsc::channel::<Result<AssessmentResponse, ApiError>>();
        app.pending_questions = Some(rx);
        app.timer.reset(30);

        app.ir_a_bienvenida();
        assert!(!app.is_network_pending());
        assert!(!app.timer.is_active());
    }

    #[test]
    fn late_bank_response_is_ignored_after_leaving_the_quiz() {
        let mut app = app();
        app.session.tutorial_id = Some(35368);
        app.session.begin_loading(Some(35368));
        app.state = AppState::Quiz;

        let (tx, rx) = mpsc::channel();
        app.pending_questions = Some(rx);
        // El usuario cambia de pantalla antes de que llegue la respuesta
        app.state = AppState::Dashboard;
        tx.send(Ok(respuesta_banco())).unwrap();

        app.tick(1000.0);
        assert_eq!(app.state, AppState::Dashboard);
        assert_ne!(app.session.phase, SessionPhase::InProgress);
        assert!(app.cache.get(35368).is_none());
        assert!(!app.is_network_pending());
    }

    #[test]
    fn late_submit_response_never_caches_a_result() {
        let mut app = app();
        app.session.tutorial_id = Some(35368);
        app.session.begin_loading(Some(35368));
        app.state = AppState::Quiz;

        let (tx, rx) = mpsc::channel();
        app.pending_submit = Some(rx);
        app.ir_al_dashboard();
        // La navegación ya descartó el canal; un envío nuevo tampoco
        // debe aplicarse con la vista cambiada
        let (tx2, rx2) = mpsc::channel();
        app.pending_submit = Some(rx2);
        drop(tx);
        tx2.send(Ok(Default::default())).unwrap();

        app.tick(1000.0);
        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.cache.get(35368).is_none());
        assert!(app.last_result.is_none());
    }

    #[test]
    fn failed_final_submit_resumes_the_clock() {
        let mut app = app();
        app.session = QuizSession::new(QuizKind::Summative);
        app.session.begin_loading(None);
        app.session.apply_questions(vec![pregunta("f1")], false, 1000.0);
        app.session.select_answer(1);
        app.state = AppState::FinalQuiz;
        app.timer.reset(600);

        app.session.try_begin_submit(false).unwrap();
        pausa_de_envio(&mut app);
        let (tx, rx) = mpsc::channel();
        app.pending_final_submit = Some(rx);
        tx.send(Err(ApiError::Network("conexión rechazada".into())))
            .unwrap();

        app.tick(1010.0);
        assert_eq!(app.session.phase, SessionPhase::InProgress);
        assert!(app.submit_error.is_some());
        assert!(app.timer.is_active());
    }

    #[test]
    fn failed_submit_with_exhausted_clock_stays_stopped() {
        let mut app = app();
        app.session = QuizSession::new(QuizKind::Summative);
        app.session.begin_loading(None);
        app.session.apply_questions(vec![pregunta("f1")], false, 1000.0);
        app.state = AppState::FinalQuiz;
        // Envío forzado por vencimiento: el reloj ya está a cero
        app.timer.reset(1);
        app.timer.tick(1000.0);
        assert!(app.timer.tick(1001.0));

        app.session.try_begin_submit(true).unwrap();
        pausa_de_envio(&mut app);
        let (tx, rx) = mpsc::channel();
        app.pending_final_submit = Some(rx);
        tx.send(Err(ApiError::Network("conexión rechazada".into())))
            .unwrap();

        app.tick(1002.0);
        assert_eq!(app.session.phase, SessionPhase::InProgress);
        assert_eq!(app.timer.remaining_secs(), 0);
        assert!(!app.timer.is_active());
    }

    // Lo que hace enviar_respuestas justo antes de despachar la petición
    fn pausa_de_envio(app: &mut QuizApp) {
        app.submit_error = None;
        app.timer.set_active(false);
    }
}
