// src/analytics.rs
//
// Derivación pura de los datos del dashboard a partir de la caché de
// resultados: aprobado/suspenso, ranking de submódulos flojos,
// recomendaciones y bandas de color. Sin red y sin efectos.

use std::collections::HashMap;

use crate::data::submodule_display_name;
use crate::model::{AnswerDetail, SubmoduleResult};

// Política de evaluación del módulo (constantes fijas, no derivadas)
pub const PASS_SUBMODULE_RATIO: f64 = 0.75;
pub const PASS_MIN_CORRECT: u32 = 2;
pub const PASS_FINAL_MIN_SCORE: f64 = 60.0;
pub const WEAK_SCORE_THRESHOLD: f64 = 75.0;
pub const WEAK_CAP: usize = 3;
pub const CLUSTER_CAP: usize = 3;

/// Banda de severidad para colorear celdas del dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Good,
    Warning,
    Poor,
}

pub fn score_band(score: f64) -> Band {
    if score >= 85.0 {
        Band::Good
    } else if score >= 60.0 {
        Band::Warning
    } else {
        Band::Poor
    }
}

pub fn duration_band(secs: u64) -> Band {
    if secs <= 55 {
        Band::Good
    } else if secs <= 75 {
        Band::Warning
    } else {
        Band::Poor
    }
}

pub fn attempts_band(attempts: u32) -> Band {
    if attempts <= 1 {
        Band::Good
    } else if attempts == 2 {
        Band::Warning
    } else {
        Band::Poor
    }
}

/// Aprobado si ≥75% de los submódulos tienen al menos 2 aciertos y la
/// nota del quiz final llega a 60. Sin submódulos no hay aprobado.
pub fn compute_pass_status(submodules: &[SubmoduleResult], final_score: f64) -> bool {
    if submodules.is_empty() {
        return false;
    }
    let passed = submodules
        .iter()
        .filter(|s| s.correct >= PASS_MIN_CORRECT)
        .count();
    let ratio = passed as f64 / submodules.len() as f64;
    ratio >= PASS_SUBMODULE_RATIO && final_score >= PASS_FINAL_MIN_SCORE
}

/// Submódulos a reforzar: nota ascendente, desempate por más duración y
/// después por más intentos; solo nota < 75, máximo 3.
pub fn rank_weak_submodules(submodules: &[SubmoduleResult]) -> Vec<SubmoduleResult> {
    let mut sorted: Vec<SubmoduleResult> = submodules.to_vec();
    sorted.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.duration_secs.cmp(&a.duration_secs))
            .then(b.attempts.cmp(&a.attempts))
    });
    sorted.retain(|s| s.score < WEAK_SCORE_THRESHOLD);
    sorted.truncate(WEAK_CAP);
    sorted
}

/// Fallos del quiz final agrupados por submódulo de origen. La clave
/// None agrupa las preguntas que no se pudieron mapear; se informan,
/// no se descartan.
fn wrong_answer_clusters(
    final_answers: &[AnswerDetail],
    question_tutorial: &HashMap<String, u32>,
) -> Vec<(Option<u32>, u32)> {
    let mut counts: HashMap<Option<u32>, u32> = HashMap::new();
    for a in final_answers.iter().filter(|a| !a.correct) {
        let tid = a
            .tutorial_id
            .or_else(|| question_tutorial.get(&a.question_id).copied());
        *counts.entry(tid).or_insert(0) += 1;
    }
    let mut clusters: Vec<(Option<u32>, u32)> = counts.into_iter().collect();
    clusters.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    clusters.truncate(CLUSTER_CAP);
    clusters
}

/// Textos de recomendación del dashboard: una línea por submódulo flojo
/// más los grupos de fallos del quiz final; un mensaje genérico de
/// "continúa" si no hay nada que señalar.
pub fn build_recommendations(
    submodules: &[SubmoduleResult],
    final_answers: &[AnswerDetail],
    question_tutorial: &HashMap<String, u32>,
) -> Vec<String> {
    let mut recs = Vec::new();

    for s in rank_weak_submodules(submodules) {
        recs.push(format!(
            "Refuerza: {} (nota {:.0}%, {} s, {} intentos).",
            s.name, s.score, s.duration_secs, s.attempts
        ));
    }

    for (tid, count) in wrong_answer_clusters(final_answers, question_tutorial) {
        match tid {
            Some(id) => recs.push(format!(
                "Quiz final: {count} fallos relacionados con {}; repasa ese material.",
                submodule_display_name(id)
            )),
            None => recs.push(format!(
                "Quiz final: {count} fallos sin submódulo asociado. Revísalos en la corrección."
            )),
        }
    }

    if recs.is_empty() {
        recs.push(
            "Todos los submódulos están bastante bien. Continúa con el siguiente material \
             o repasa el quiz final para afianzar conceptos."
                .to_string(),
        );
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: u32, score: f64, correct: u32, duration: u64, attempts: u32) -> SubmoduleResult {
        SubmoduleResult {
            id,
            name: format!("Submódulo {id}"),
            score,
            correct,
            total: 3,
            duration_secs: duration,
            attempts,
        }
    }

    fn wrong(question_id: &str, tutorial_id: Option<u32>) -> AnswerDetail {
        AnswerDetail {
            question_id: question_id.to_string(),
            tutorial_id,
            correct: false,
            user_answer: "A".into(),
            answer: "B".into(),
            explanation: String::new(),
        }
    }

    #[test]
    fn pass_needs_three_quarters_and_final_sixty() {
        // [80,90,60,40] con todos ≥2 aciertos y final 65 → 3/4 = 0.75 → aprobado
        let subs = vec![
            sub(1, 80.0, 3, 30, 1),
            sub(2, 90.0, 3, 30, 1),
            sub(3, 60.0, 2, 30, 1),
            sub(4, 40.0, 1, 30, 1),
        ];
        assert!(compute_pass_status(&subs, 65.0));
        assert!(!compute_pass_status(&subs, 59.9));
    }

    #[test]
    fn pass_fails_below_submodule_ratio() {
        let subs = vec![
            sub(1, 80.0, 3, 30, 1),
            sub(2, 40.0, 1, 30, 1),
            sub(3, 40.0, 1, 30, 1),
            sub(4, 40.0, 1, 30, 1),
        ];
        assert!(!compute_pass_status(&subs, 90.0));
    }

    #[test]
    fn no_submodules_is_never_a_pass() {
        assert!(!compute_pass_status(&[], 100.0));
    }

    #[test]
    fn weak_ranking_orders_and_caps() {
        let subs = vec![
            sub(1, 90.0, 3, 30, 1), // fuera: nota ≥ 75
            sub(2, 50.0, 1, 40, 1),
            sub(3, 50.0, 1, 90, 1), // misma nota, más duración → antes
            sub(4, 70.0, 2, 30, 3),
            sub(5, 20.0, 0, 10, 1),
            sub(6, 60.0, 2, 30, 1),
        ];
        let weak = rank_weak_submodules(&subs);
        assert_eq!(weak.len(), 3);
        assert_eq!(weak[0].id, 5);
        assert_eq!(weak[1].id, 3); // desempate por duración descendente
        assert_eq!(weak[2].id, 2);
    }

    #[test]
    fn weak_ranking_tie_breaks_by_attempts() {
        let subs = vec![sub(1, 50.0, 1, 30, 1), sub(2, 50.0, 1, 30, 4)];
        let weak = rank_weak_submodules(&subs);
        assert_eq!(weak[0].id, 2); // más intentos primero
    }

    #[test]
    fn recommendations_cluster_final_failures_by_submodule() {
        let mut lookup = HashMap::new();
        lookup.insert("f1".to_string(), 35368u32);
        lookup.insert("f2".to_string(), 35368u32);
        let answers = vec![
            wrong("f1", None),
            wrong("f2", None),
            wrong("f3", None), // sin mapeo posible
        ];
        let recs = build_recommendations(&[], &answers, &lookup);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("2 fallos"));
        assert!(recs[0].contains("Introducción a la IA"));
        assert!(recs[1].contains("sin submódulo asociado"));
    }

    #[test]
    fn generic_message_when_nothing_to_report() {
        let subs = vec![sub(1, 90.0, 3, 30, 1)];
        let recs = build_recommendations(&subs, &[], &HashMap::new());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("Todos los submódulos"));
    }

    #[test]
    fn bands_use_fixed_thresholds() {
        assert_eq!(score_band(85.0), Band::Good);
        assert_eq!(score_band(60.0), Band::Warning);
        assert_eq!(score_band(59.9), Band::Poor);
        assert_eq!(duration_band(55), Band::Good);
        assert_eq!(duration_band(75), Band::Warning);
        assert_eq!(duration_band(76), Band::Poor);
        assert_eq!(attempts_band(1), Band::Good);
        assert_eq!(attempts_band(2), Band::Warning);
        assert_eq!(attempts_band(3), Band::Poor);
    }
}
