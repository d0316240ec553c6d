use crate::QuizApp;
use crate::data::SUBMODULES;
use egui::{Align, Button, CentralPanel, Context, RichText, ScrollArea};

pub fn ui_welcome(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 540.0;
        let content_width = ui.available_width().min(max_width);

        ui.horizontal_centered(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(16, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.heading("👋 ¡Bienvenido a LearnCheck!");
                        ui.add_space(6.0);
                        ui.label("Comprueba lo aprendido en cada submódulo y, cuando los tengas todos, enfréntate al quiz final.");
                        ui.add_space(14.0);

                        let btn_w = (content_width * 0.9).clamp(120.0, 420.0);
                        let btn_h = 34.0;

                        ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                            for meta in SUBMODULES {
                                let done = app.cache.get(meta.id).is_some();
                                let label = if done {
                                    format!("✅ {}", meta.title)
                                } else {
                                    format!("📝 {}", meta.title)
                                };
                                if ui.add_sized([btn_w, btn_h], Button::new(label)).clicked() {
                                    app.abrir_quiz(meta.id);
                                }
                                ui.add_space(4.0);
                            }
                        });

                        ui.add_space(12.0);
                        let final_done = app.cache.get_final().is_some();
                        let final_label = if final_done {
                            "🏁 Quiz final (completado)"
                        } else {
                            "🏁 Quiz final"
                        };
                        if ui.add_sized([btn_w, 40.0], Button::new(final_label)).clicked() {
                            app.abrir_quiz_final();
                        }
                        ui.add_space(4.0);
                        if ui.add_sized([btn_w, 40.0], Button::new("📊 Mi progreso")).clicked() {
                            app.ir_al_dashboard();
                        }

                        if !app.message.is_empty() {
                            ui.add_space(10.0);
                            ui.label(RichText::new(&app.message).strong());
                        }
                    });
                });
        });
    });
}
