use crate::QuizApp;
use crate::ui::layout::{centered_panel, two_button_row};
use crate::view_models::{fmt_pct, fmt_secs};
use egui::{Color32, Context, RichText, ScrollArea};

pub fn ui_results(app: &mut QuizApp, ctx: &Context) {
    let result = match app.last_result.clone() {
        Some(r) => r,
        None => {
            app.ir_a_bienvenida();
            return;
        }
    };

    centered_panel(ctx, 480.0, 640.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(format!("📋 Resultado: {}", app.nombre_submodulo_actual()));
            ui.add_space(8.0);
            ui.label(
                RichText::new(fmt_pct(result.score))
                    .size(34.0)
                    .strong(),
            );
            ui.label(format!(
                "{} de {} correctas en {}",
                result.correct,
                result.total,
                fmt_secs(result.duration_secs)
            ));
            if result.is_mock {
                ui.label(
                    RichText::new("⚠ Resultado de práctica sin conexión; no cuenta en el servidor.")
                        .color(Color32::YELLOW),
                );
            }

            if let Some(fb) = &result.feedback {
                ui.add_space(8.0);
                if !fb.summary.is_empty() {
                    ui.label(RichText::new(&fb.summary).strong());
                }
                if !fb.advice.is_empty() {
                    ui.label(&fb.advice);
                }
            }

            ui.add_space(10.0);
            ui.separator();

            // Corrección pregunta a pregunta
            ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                for (i, d) in result.detail.iter().enumerate() {
                    let mark = if d.correct { "✅" } else { "❌" };
                    let prompt = result
                        .questions
                        .get(i)
                        .map(|q| q.prompt.as_str())
                        .unwrap_or("");
                    ui.label(RichText::new(format!("{mark} {}. {prompt}", i + 1)).strong());
                    if d.user_answer.is_empty() {
                        ui.label("   Sin respuesta (tiempo agotado)");
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
            let (reintentar, progreso) = two_button_row(ui, 460.0, "🔁 Reintentar", "📊 Mi progreso");
            if reintentar {
                app.reintentar_quiz();
            }
            if progreso {
                app.ir_al_dashboard();
            }
        });
    });
}
