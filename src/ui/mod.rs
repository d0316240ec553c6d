pub mod layout;
pub mod views;

use crate::app::{QuizApp, now_secs};
use crate::model::AppState;
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for QuizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let now = now_secs();

        // Canales de red y temporizador se bombean una vez por frame
        self.tick(now);

        if !matches!(self.state, AppState::Welcome) {
            top_panel(self, ctx);
        }
        bottom_panel(ctx);

        // Dispatch por estado a las vistas
        match self.state {
            AppState::Welcome => views::welcome::ui_welcome(self, ctx),
            AppState::QuizIntro => views::quiz_intro::ui_quiz_intro(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx, now),
            AppState::QuizResults => views::results::ui_results(self, ctx),
            AppState::FinalIntro => views::final_intro::ui_final_intro(self, ctx),
            AppState::FinalQuiz => views::final_quiz::ui_final_quiz(self, ctx, now),
            AppState::FinalResults => views::final_results::ui_final_results(self, ctx),
            AppState::Dashboard => views::dashboard::ui_dashboard(self, ctx),
        }

        // Mientras corre un reloj o hay red en vuelo, repintar solo
        if self.timer.is_active() || self.is_network_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}
