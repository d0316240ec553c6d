use crate::QuizApp;
use crate::session::SessionPhase;
use crate::ui::layout::centered_panel;
use egui::{Button, Color32, Context, RichText, ScrollArea};

pub fn ui_quiz(app: &mut QuizApp, ctx: &Context, now: f64) {
    match app.session.phase {
        SessionPhase::Loading => {
            centered_panel(ctx, 120.0, 420.0, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Cargando preguntas...");
                });
            });
        }
        SessionPhase::Submitting => {
            centered_panel(ctx, 140.0, 420.0, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Corrigiendo tus respuestas...");
                });
            });
        }
        _ => ui_quiz_in_progress(app, ctx, now),
    }
}

fn ui_quiz_in_progress(app: &mut QuizApp, ctx: &Context, now: f64) {
    let current = app.session.current_index;
    let question = match app.session.current_question().cloned() {
        Some(q) => q,
        None => return,
    };
    let selected = app.session.ledger.selected(current);
    let answered = selected.is_some();
    let is_last = app.session.is_last_question();
    let is_mock = app.session.is_mock;
    let submit_error = app.submit_error.clone();

    centered_panel(ctx, 420.0, 640.0, |ui| {
        ui.vertical_centered(|ui| {
            // Cabecera: posición y cuenta atrás
            ui.horizontal(|ui| {
                ui.heading(app.progreso_texto());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let timer_text = format!("⏱ {}", app.timer.format());
                    if app.timer.is_warning() && app.timer.is_active() {
                        ui.label(RichText::new(timer_text).color(Color32::RED).strong());
                    } else {
                        ui.label(RichText::new(timer_text).strong());
                    }
                });
            });
            if is_mock {
                ui.label(
                    RichText::new("⚠ Modo de práctica sin conexión")
                        .color(Color32::YELLOW),
                );
            }
            ui.separator();

            ui.add_space(8.0);
            ui.label(RichText::new(&question.prompt).size(17.0));
            ui.add_space(10.0);

            // Opciones: clicables hasta la primera selección, que bloquea
            let mut clicked: Option<usize> = None;
            ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                for (i, choice) in question.choices.iter().enumerate() {
                    let is_correct = choice.correct == Some(true);
                    let is_selected = selected == Some(i);

                    let label = if answered && is_correct {
                        RichText::new(format!("✅ {}", choice.text))
                            .color(Color32::from_rgb(70, 200, 120))
                    } else if answered && is_selected {
                        RichText::new(format!("❌ {}", choice.text))
                            .color(Color32::from_rgb(230, 90, 90))
                    } else {
                        RichText::new(&choice.text)
                    };

                    let btn = ui.add_sized(
                        [ui.available_width().min(560.0), 34.0],
                        Button::new(label),
                    );
                    if btn.clicked() && !answered {
                        clicked = Some(i);
                    }
                    ui.add_space(4.0);
                }
            });
            if let Some(i) = clicked {
                app.seleccionar_respuesta(i);
            }

            // Explicación tras responder
            if let Some(sel) = app.session.ledger.selected(current) {
                let explanation = question
                    .choices
                    .get(sel)
                    .and_then(|c| c.explanation.clone())
                    .or_else(|| {
                        question
                            .correct_choice()
                            .and_then(|c| question.choices.get(c))
                            .and_then(|c| c.explanation.clone())
                    });
                if let Some(text) = explanation {
                    ui.add_space(6.0);
                    ui.label(RichText::new(format!("💡 {text}")).italics());
                }

                ui.add_space(12.0);
                let label = if is_last { "📤 Ver mi resultado" } else { "Siguiente ➡" };
                if ui.add_sized([220.0, 36.0], Button::new(label)).clicked() {
                    if is_last {
                        app.enviar_respuestas(false, now);
                    } else {
                        app.avanzar_pregunta();
                    }
                }
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
