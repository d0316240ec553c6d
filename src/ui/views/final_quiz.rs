use crate::QuizApp;
use crate::session::SessionPhase;
use crate::ui::layout::{centered_panel, two_button_row};
use egui::{Button, Color32, Context, RichText, ScrollArea};

pub fn ui_final_quiz(app: &mut QuizApp, ctx: &Context, now: f64) {
    match app.session.phase {
        SessionPhase::Loading => {
            centered_panel(ctx, 120.0, 420.0, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Cargando el quiz final...");
                });
            });
        }
        SessionPhase::Failed => {
            let error = app
                .fetch_error
                .clone()
                .unwrap_or_else(|| "No se pudo cargar el quiz final.".to_string());
            centered_panel(ctx, 180.0, 460.0, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("❌ Algo ha fallado");
                    ui.add_space(8.0);
                    ui.label(error);
                    ui.add_space(14.0);
                    let (reintentar, volver) = two_button_row(ui, 380.0, "🔁 Reintentar", "🔙 Volver");
                    if reintentar {
                        app.reintentar_carga();
                    }
                    if volver {
                        app.ir_a_bienvenida();
                    }
                });
            });
        }
        SessionPhase::Submitting => {
            centered_panel(ctx, 140.0, 420.0, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Enviando tus respuestas...");
                });
            });
        }
        _ => ui_final_in_progress(app, ctx, now),
    }
}

fn ui_final_in_progress(app: &mut QuizApp, ctx: &Context, now: f64) {
    let current = app.session.current_index;
    let total = app.session.total();
    let question = match app.session.current_question().cloned() {
        Some(q) => q,
        None => return,
    };
    let selected = app.session.ledger.selected(current);
    let answered_flags: Vec<bool> = (0..total)
        .map(|i| app.session.ledger.selected(i).is_some())
        .collect();
    let submit_error = app.submit_error.clone();

    centered_panel(ctx, 460.0, 680.0, |ui| {
        ui.vertical_centered(|ui| {
            // Cabecera: posición, respondidas y reloj global
            ui.horizontal(|ui| {
                ui.heading(app.progreso_texto());
                ui.label(app.respondidas_texto());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let timer_text = format!("⏱ {}", app.timer.format());
                    if app.timer.is_warning() {
                        ui.label(RichText::new(timer_text).color(Color32::RED).strong());
                    } else {
                        ui.label(RichText::new(timer_text).strong());
                    }
                });
            });

            // Rejilla de navegación: un botón por pregunta
            let mut jump: Option<usize> = None;
            ui.horizontal_wrapped(|ui| {
                for (i, answered) in answered_flags.iter().enumerate() {
                    let label = if i == current {
                        RichText::new(format!("[{}]", i + 1)).strong()
                    } else if *answered {
                        RichText::new(format!("{}", i + 1))
                            .color(Color32::from_rgb(70, 200, 120))
                    } else {
                        RichText::new(format!("{}", i + 1))
                    };
                    if ui.add(Button::new(label).min_size([30.0, 26.0].into())).clicked() {
                        jump = Some(i);
                    }
                }
            });
            if let Some(i) = jump {
                app.ir_a_pregunta(i);
            }
            ui.separator();

            ui.add_space(8.0);
            ui.label(RichText::new(&question.prompt).size(17.0));
            ui.add_space(10.0);

            // Opciones editables hasta el envío
            let mut clicked: Option<usize> = None;
            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for (i, choice) in question.choices.iter().enumerate() {
                    let is_selected = selected == Some(i);
                    let response = ui.add_sized(
                        [ui.available_width().min(600.0), 34.0],
                        egui::SelectableLabel::new(is_selected, &choice.text),
                    );
                    if response.clicked() {
                        clicked = Some(i);
                    }
                    ui.add_space(4.0);
                }
            });
            if let Some(i) = clicked {
                app.seleccionar_respuesta(i);
            }

            ui.add_space(12.0);
            let (anterior, siguiente) = two_button_row(ui, 460.0, "⬅ Anterior", "Siguiente ➡");
            if anterior {
                app.retroceder_pregunta();
            }
            if siguiente {
                app.avanzar_pregunta();
            }

            ui.add_space(8.0);
            if ui
                .add_sized([260.0, 38.0], Button::new("📤 Enviar respuestas"))
                .clicked()
            {
                app.enviar_respuestas(false, now);
            }

            if let Some(err) = submit_error {
                ui.add_space(8.0);
                ui.label(RichText::new(format!("❌ {err}")).color(Color32::RED));
                if ui.button("🔁 Reintentar envío").clicked() {
                    app.reintentar_envio(now);
                }
            }

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }
        });
    });
}
