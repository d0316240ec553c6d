use crate::QuizApp;
use crate::app::{FORMATIVE_QUESTION_SECS, MAX_FORMATIVE_QUESTIONS};
use crate::ui::layout::{centered_panel, two_button_row};
use egui::Context;

pub fn ui_quiz_intro(app: &mut QuizApp, ctx: &Context) {
    centered_panel(ctx, 260.0, 520.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(format!("📝 {}", app.nombre_submodulo_actual()));
            ui.add_space(10.0);
            ui.label(format!(
                "Hasta {MAX_FORMATIVE_QUESTIONS} preguntas tipo test. Tienes {FORMATIVE_QUESTION_SECS} segundos por pregunta."
            ));
            ui.label("La primera respuesta que marques queda fijada y verás al momento si es correcta.");
            ui.label("Si se acaba el tiempo de una pregunta, cuenta como fallo y pasas a la siguiente.");
            ui.add_space(16.0);

            let (empezar, volver) = two_button_row(ui, 420.0, "▶ Empezar", "🔙 Volver");
            if empezar {
                app.empezar_quiz();
            }
            if volver {
                app.ir_a_bienvenida();
            }
        });
    });
}
