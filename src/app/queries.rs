use std::collections::HashMap;

use super::*;
use crate::data::submodule_display_name;

impl QuizApp {
    pub fn nombre_submodulo_actual(&self) -> String {
        self.session
            .tutorial_id
            .map(submodule_display_name)
            .unwrap_or_else(|| "Quiz final".to_string())
    }

    /// "Pregunta 2 de 3" para la cabecera del quiz
    pub fn progreso_texto(&self) -> String {
        format!(
            "Pregunta {} de {}",
            self.session.current_index + 1,
            self.session.total()
        )
    }

    pub fn respondidas_texto(&self) -> String {
        format!(
            "{} de {} respondidas",
            self.session.ledger.answered_count(),
            self.session.total()
        )
    }

    /// Id de pregunta → submódulo de origen, a partir de las preguntas
    /// cargadas en la sesión (solo el quiz final lo trae).
    pub fn question_tutorial_lookup(&self) -> HashMap<String, u32> {
        self.session
            .questions
            .iter()
            .filter_map(|q| q.tutorial_id.map(|t| (q.id.clone(), t)))
            .collect()
    }
}
