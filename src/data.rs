// src/data.rs

use crate::model::{Feedback, Question};

/// Submódulo del catálogo estático del módulo de IA
#[derive(Clone, Copy, Debug)]
pub struct SubmoduleMeta {
    pub id: u32,
    pub title: &'static str,
}

/// Catálogo del módulo "Fundamentos de IA". Los ids coinciden con los
/// tutorial_id que devuelve el backend para poder mapear preguntas del
/// quiz final a su submódulo de origen.
pub const SUBMODULES: &[SubmoduleMeta] = &[
    SubmoduleMeta { id: 35363, title: "La IA en el mundo real" },
    SubmoduleMeta { id: 35368, title: "Introducción a la IA" },
    SubmoduleMeta { id: 35373, title: "Taxonomía de la IA" },
    SubmoduleMeta { id: 35378, title: "Flujo de trabajo de IA" },
    SubmoduleMeta { id: 35383, title: "[Historia] Facilitar el trabajo con IA" },
    SubmoduleMeta { id: 35398, title: "Introducción a los datos" },
    SubmoduleMeta { id: 35403, title: "Criterios de datos para IA" },
    SubmoduleMeta { id: 35408, title: "[Historia] ¿Qué hace falta para crear una IA?" },
    SubmoduleMeta { id: 35428, title: "Tipos de Machine Learning" },
    SubmoduleMeta { id: 35793, title: "Infraestructura de datos en la industria" },
];

pub fn submodule_title(id: u32) -> Option<&'static str> {
    SUBMODULES.iter().find(|s| s.id == id).map(|s| s.title)
}

/// Nombre a mostrar: título del catálogo o genérico si el id no consta
pub fn submodule_display_name(id: u32) -> String {
    submodule_title(id)
        .map(|t| t.to_string())
        .unwrap_or_else(|| format!("Submódulo {id}"))
}

/// Carga el banco de preguntas mock desde el JSON embebido. Se usa como
/// fallback cuando el backend no devuelve preguntas para un submódulo.
pub fn read_mock_questions() -> Vec<Question> {
    let file_content = include_str!("data/mock_questions.json");
    serde_json::from_str(file_content).expect("No se pudo parsear el banco de preguntas mock")
}

/// Feedback fijo para resultados calculados en modo mock
pub fn mock_feedback() -> Feedback {
    Feedback {
        summary: "Modo offline: resultado basado en preguntas mock.".to_string(),
        advice: "Vuelve a intentarlo cuando el backend responda para obtener una puntuación oficial.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_bank_has_questions_with_correct_choice() {
        let bank = read_mock_questions();
        assert_eq!(bank.len(), 3);
        for q in &bank {
            assert!(q.correct_choice().is_some());
            assert_eq!(q.choices.len(), 4);
        }
    }

    #[test]
    fn submodule_title_lookup() {
        assert_eq!(submodule_title(35368), Some("Introducción a la IA"));
        assert_eq!(submodule_title(99999), None);
        assert_eq!(submodule_display_name(99999), "Submódulo 99999");
    }
}
