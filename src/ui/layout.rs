use crate::QuizApp;
use crate::analytics::Band;
use egui::{Button, CentralPanel, Color32, Context, Frame, Ui, Visuals};

const BUTTON_HEIGHT: f32 = 36.0;
const BUTTON_GAP: f32 = 8.0;

/// Barra de navegación superior, común a todas las pantallas menos la
/// bienvenida.
pub fn top_panel(app: &mut QuizApp, ctx: &Context) {
    egui::TopBottomPanel::top("learncheck_nav").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            if ui.button("🏠 Inicio").clicked() {
                app.ir_a_bienvenida();
            }
            if ui.button("📊 Mi progreso").clicked() {
                app.ir_al_dashboard();
            }
            // Solo tiene sentido dentro de la plataforma
            if app.embedded && ui.button("📚 Volver al material").clicked() {
                app.volver_al_material();
            }
        });
    });
}

/// Pie con el conmutador de tema
pub fn bottom_panel(ctx: &Context) {
    egui::TopBottomPanel::bottom("learncheck_footer").show(ctx, |ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let dark = ui.visuals().dark_mode;
            let label = if dark { "☀ Modo claro" } else { "🌙 Modo oscuro" };
            if ui.button(label).clicked() {
                ctx.set_visuals(if dark { Visuals::light() } else { Visuals::dark() });
            }
        });
    });
}

/// Panel central con el contenido centrado en vertical y acotado en
/// anchura; `est_height` es la altura estimada del bloque interior.
pub fn centered_panel(
    ctx: &Context,
    est_height: f32,
    max_width: f32,
    inner: impl FnOnce(&mut Ui),
) {
    CentralPanel::default().show(ctx, |ui| {
        let slack = ((ui.available_height() - est_height) / 2.0).max(0.0);
        ui.add_space(slack);
        Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(egui::Margin::symmetric(16, 16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width().min(max_width));
                inner(ui);
            });
        ui.add_space(slack);
    });
}

/// Fila centrada con dos botones de igual anchura. Devuelve
/// (clic izquierdo, clic derecho).
pub fn two_button_row(
    ui: &mut Ui,
    panel_width: f32,
    left_label: &str,
    right_label: &str,
) -> (bool, bool) {
    let btn_w = (panel_width - BUTTON_GAP) / 2.0;
    let size = [btn_w, BUTTON_HEIGHT];
    ui.horizontal(|ui| {
        ui.add_space((ui.available_width() - panel_width) / 2.0);
        let left = ui.add_sized(size, Button::new(left_label)).clicked();
        let right = ui.add_sized(size, Button::new(right_label)).clicked();
        (left, right)
    })
    .inner
}

/// Color de texto de las celdas del dashboard según la banda
pub fn band_color(band: Band) -> Color32 {
    match band {
        Band::Good => Color32::from_rgb(70, 200, 120),
        Band::Warning => Color32::from_rgb(230, 180, 60),
        Band::Poor => Color32::from_rgb(230, 90, 90),
    }
}
