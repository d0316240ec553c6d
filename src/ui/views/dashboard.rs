use std::collections::HashMap;

use crate::QuizApp;
use crate::analytics::{build_recommendations, compute_pass_status};
use crate::ui::layout::{band_color, centered_panel};
use crate::view_models::{dashboard_rows, fmt_pct, fmt_secs};
use egui::{Color32, Context, Grid, RichText, ScrollArea};

pub fn ui_dashboard(app: &mut QuizApp, ctx: &Context) {
    let aggregates = app.cache.aggregates();
    let final_result = app.final_result.clone().or_else(|| app.cache.get_final());
    let final_score = final_result.as_ref().map(|r| r.score).unwrap_or(0.0);
    let passed = final_result.is_some() && compute_pass_status(&aggregates, final_score);

    // Mapa id de pregunta → submódulo para agrupar los fallos del final
    let lookup: HashMap<String, u32> = final_result
        .as_ref()
        .map(|r| {
            r.questions
                .iter()
                .filter_map(|q| q.tutorial_id.map(|t| (q.id.clone(), t)))
                .collect()
        })
        .unwrap_or_default();
    let final_detail = final_result.as_ref().map(|r| r.detail.as_slice()).unwrap_or(&[]);
    let recommendations = build_recommendations(&aggregates, final_detail, &lookup);

    centered_panel(ctx, 520.0, 720.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("📊 Mi progreso");
            ui.add_space(6.0);

            match &final_result {
                Some(r) if passed => {
                    ui.label(
                        RichText::new(format!("🎉 Módulo superado (final: {})", fmt_pct(r.score)))
                            .color(Color32::from_rgb(70, 200, 120))
                            .strong(),
                    );
                }
                Some(r) => {
                    ui.label(
                        RichText::new(format!("Módulo aún no superado (final: {})", fmt_pct(r.score)))
                            .color(Color32::from_rgb(230, 180, 60))
                            .strong(),
                    );
                }
                None => {
                    ui.label("Todavía no has hecho el quiz final.");
                }
            }

            ui.add_space(10.0);
            if aggregates.is_empty() {
                ui.label("Aún no hay resultados de submódulos. ¡Empieza por el primero!");
            } else {
                ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                    Grid::new("dashboard_grid")
                        .num_columns(4)
                        .spacing([18.0, 6.0])
                        .striped(true)
                        .show(ui, |ui| {
                            ui.label(RichText::new("Submódulo").strong());
                            ui.label(RichText::new("Nota").strong());
                            ui.label(RichText::new("Tiempo").strong());
                            ui.label(RichText::new("Intentos").strong());
                            ui.end_row();

                            for row in dashboard_rows(&aggregates) {
                                ui.label(&row.name);
                                ui.label(
                                    RichText::new(fmt_pct(row.score))
                                        .color(band_color(row.score_band)),
                                );
                                ui.label(
                                    RichText::new(fmt_secs(row.duration_secs))
                                        .color(band_color(row.duration_band)),
                                );
                                ui.label(
                                    RichText::new(format!("{}", row.attempts))
                                        .color(band_color(row.attempts_band)),
                                );
                                ui.end_row();
                            }
                        });
                });
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label(RichText::new("Recomendaciones").strong());
            for rec in &recommendations {
                ui.label(format!("• {rec}"));
            }

            ui.add_space(14.0);
            if ui.button("🔙 Volver al inicio").clicked() {
                app.ir_a_bienvenida();
            }
        });
    });
}
