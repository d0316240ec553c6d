// src/view_models.rs
//
// Estructuras de solo lectura que la UI pinta tal cual: filas del
// dashboard con sus bandas de color y formateo de notas y tiempos.

use crate::analytics::{Band, attempts_band, duration_band, score_band};
use crate::model::SubmoduleResult;

pub struct DashboardRow {
    pub id: u32,
    pub name: String,
    pub score: f64,
    pub duration_secs: u64,
    pub attempts: u32,
    pub score_band: Band,
    pub duration_band: Band,
    pub attempts_band: Band,
}

/// Filas del dashboard, ordenadas por id de submódulo
pub fn dashboard_rows(submodules: &[SubmoduleResult]) -> Vec<DashboardRow> {
    let mut rows: Vec<DashboardRow> = submodules
        .iter()
        .map(|s| DashboardRow {
            id: s.id,
            name: s.name.clone(),
            score: s.score,
            duration_secs: s.duration_secs,
            attempts: s.attempts,
            score_band: score_band(s.score),
            duration_band: duration_band(s.duration_secs),
            attempts_band: attempts_band(s.attempts),
        })
        .collect();
    rows.sort_by_key(|r| r.id);
    rows
}

/// "80%" para notas redondas, "66.67%" para el resto
pub fn fmt_pct(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}%")
    } else {
        format!("{score:.2}%")
    }
}

pub fn fmt_secs(secs: u64) -> String {
    if secs < 60 {
        format!("{secs} s")
    } else {
        format!("{} min {:02} s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: u32, score: f64) -> SubmoduleResult {
        SubmoduleResult {
            id,
            name: format!("S{id}"),
            score,
            correct: 2,
            total: 3,
            duration_secs: 40,
            attempts: 1,
        }
    }

    #[test]
    fn rows_sorted_by_id_with_bands() {
        let rows = dashboard_rows(&[sub(35368, 90.0), sub(35363, 50.0)]);
        assert_eq!(rows[0].id, 35363);
        assert_eq!(rows[0].score_band, Band::Poor);
        assert_eq!(rows[1].score_band, Band::Good);
        assert_eq!(rows[0].duration_band, Band::Good);
    }

    #[test]
    fn pct_formatting_drops_trailing_zeros() {
        assert_eq!(fmt_pct(80.0), "80%");
        assert_eq!(fmt_pct(66.67), "66.67%");
        assert_eq!(fmt_pct(0.0), "0%");
    }

    #[test]
    fn secs_formatting_switches_to_minutes() {
        assert_eq!(fmt_secs(42), "42 s");
        assert_eq!(fmt_secs(65), "1 min 05 s");
        assert_eq!(fmt_secs(600), "10 min 00 s");
    }
}
