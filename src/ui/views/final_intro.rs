use crate::QuizApp;
use crate::app::FINAL_TOTAL_SECS;
use crate::ui::layout::{centered_panel, two_button_row};
use egui::Context;

pub fn ui_final_intro(app: &mut QuizApp, ctx: &Context) {
    centered_panel(ctx, 260.0, 520.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🏁 Quiz final del módulo");
            ui.add_space(10.0);
            ui.label(format!(
                "Un único examen con límite global de {} minutos.",
                FINAL_TOTAL_SECS / 60
            ));
            ui.label("Puedes moverte entre preguntas y cambiar tus respuestas hasta enviar.");
            ui.label("Para enviar hay que responderlas todas; si se agota el tiempo, se envía lo que lleves marcado.");
            ui.add_space(16.0);

            let (empezar, volver) = two_button_row(ui, 420.0, "▶ Empezar", "🔙 Volver");
            if empezar {
                app.empezar_quiz_final();
            }
            if volver {
                app.ir_a_bienvenida();
            }
        });
    });
}
