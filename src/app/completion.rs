use super::*;
use crate::api::{FinalSubmitResponse, SubmitResponse, parse_duration_secs};
use crate::data::{mock_feedback, submodule_display_name};
use crate::model::{QuizResult, round_score};

impl QuizApp {
    /// Resultado del servidor para un quiz de submódulo. Cualquier campo
    /// que falte en la respuesta se cubre con el cálculo local.
    pub fn aplicar_resultado_formativo(&mut self, mut resp: SubmitResponse, now: f64) {
        let local = self.session.local_result(now, None);
        let detail = resp.take_detail().unwrap_or(local.detail);
        let result = QuizResult {
            score: resp.score.unwrap_or(local.score),
            correct: resp.correct.unwrap_or(local.correct),
            total: resp.total.unwrap_or(local.total),
            duration_secs: parse_duration_secs(
                resp.duration.as_ref(),
                resp.duration_text.as_deref(),
            )
            .unwrap_or(local.duration_secs),
            detail,
            questions: local.questions,
            feedback: resp.feedback.take().map(|f| f.into_feedback()),
            is_mock: false,
        };
        self.finalizar_formativo(result);
    }

    /// Cierre en modo mock: todo se calcula en cliente, con un feedback
    /// genérico embebido.
    pub fn aplicar_resultado_mock(&mut self, now: f64) {
        let result = self.session.local_result(now, Some(mock_feedback()));
        self.finalizar_formativo(result);
    }

    fn finalizar_formativo(&mut self, result: QuizResult) {
        self.session.complete();
        if let Some(tid) = self.session.tutorial_id {
            self.cache
                .put(tid, &submodule_display_name(tid), &result);
            if let Some(snap) = self.session.snapshot(true) {
                self.cache.put_snapshot(tid, &snap);
            }
        }
        if self.embedded {
            crate::embed::post_quiz_submitted(self.session.tutorial_id, &result);
        }
        self.message.clear();
        self.last_result = Some(result);
        self.state = AppState::QuizResults;
    }

    /// Corrección del quiz final: el servidor decide qué es correcto;
    /// nota y duración se derivan aquí.
    pub fn aplicar_resultado_final(&mut self, resp: FinalSubmitResponse, now: f64) {
        // Mapa id de pregunta → submódulo, para las recomendaciones
        let lookup = self.question_tutorial_lookup();

        let mut detail = Vec::with_capacity(resp.results.len());
        let mut questions = Vec::with_capacity(resp.results.len());
        for row in &resp.results {
            let tid = crate::api::id_to_string(&row.question_id);
            let tid = lookup.get(&tid).copied();
            detail.push(row.to_detail(tid));
            questions.push(row.to_question(tid));
        }

        let correct = detail.iter().filter(|d| d.correct).count() as u32;
        let total = detail.len() as u32;
        let result = QuizResult {
            score: round_score(correct, total),
            correct,
            total,
            duration_secs: self.session.elapsed_secs(now),
            detail,
            questions,
            feedback: None,
            is_mock: false,
        };

        self.session.complete();
        self.cache.put_final(&result);
        if self.embedded {
            crate::embed::post_quiz_submitted(None, &result);
        }
        self.message.clear();
        self.final_result = Some(result);
        self.state = AppState::FinalResults;
    }
}
