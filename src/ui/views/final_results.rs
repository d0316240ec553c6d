use crate::QuizApp;
use crate::analytics::{PASS_FINAL_MIN_SCORE, compute_pass_status};
use crate::ui::layout::{centered_panel, two_button_row};
use crate::view_models::{fmt_pct, fmt_secs};
use egui::{Color32, Context, RichText, ScrollArea};

pub fn ui_final_results(app: &mut QuizApp, ctx: &Context) {
    let result = match app.final_result.clone() {
        Some(r) => r,
        None => {
            app.ir_a_bienvenida();
            return;
        }
    };
    let aggregates = app.cache.aggregates();
    let passed = compute_pass_status(&aggregates, result.score);

    centered_panel(ctx, 480.0, 640.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🏁 Resultado del quiz final");
            ui.add_space(8.0);
            ui.label(RichText::new(fmt_pct(result.score)).size(34.0).strong());
            ui.label(format!(
                "{} de {} correctas en {}",
                result.correct,
                result.total,
                fmt_secs(result.duration_secs)
            ));

            ui.add_space(6.0);
            if passed {
                ui.label(
                    RichText::new("🎉 ¡Módulo superado!")
                        .color(Color32::from_rgb(70, 200, 120))
                        .heading(),
                );
            } else if result.score < PASS_FINAL_MIN_SCORE {
                ui.label(
                    RichText::new("El quiz final necesita al menos un 60%. ¡Puedes repetirlo!")
                        .color(Color32::from_rgb(230, 90, 90)),
                );
            } else {
                ui.label(
                    RichText::new("Te faltan submódulos por superar; revisa tu progreso.")
                        .color(Color32::from_rgb(230, 180, 60)),
                );
            }

            ui.add_space(10.0);
            ui.separator();

            ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                for (i, d) in result.detail.iter().enumerate() {
                    let mark = if d.correct { "✅" } else { "❌" };
                    let prompt = result
                        .questions
                        .get(i)
                        .map(|q| q.prompt.as_str())
                        .unwrap_or("");
                    ui.label(RichText::new(format!("{mark} {}. {prompt}", i + 1)).strong());
                    if d.user_answer.is_empty() {
                        ui.label("   Sin respuesta");
                    } else {
                        ui.label(format!("   Tu respuesta: {}", d.user_answer));
                    }
                    if !d.correct && !d.answer.is_empty() {
                        ui.label(format!("   Correcta: {}", d.answer));
                    }
                    if !d.explanation.is_empty() {
                        ui.label(RichText::new(format!("   💡 {}", d.explanation)).italics());
                    }
                    ui.add_space(6.0);
                }
            });

            ui.add_space(12.0);
            let (repetir, progreso) = two_button_row(ui, 460.0, "🔁 Repetir quiz final", "📊 Mi progreso");
            if repetir {
                app.reintentar_quiz_final();
            }
            if progreso {
                app.ir_al_dashboard();
            }
        });
    });
}
