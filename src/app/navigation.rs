use super::*;

impl QuizApp {
    pub fn ir_a_bienvenida(&mut self) {
        self.descartar_red_pendiente();
        self.state = AppState::Welcome;
        self.message.clear();
    }

    pub fn ir_al_dashboard(&mut self) {
        self.descartar_red_pendiente();
        self.state = AppState::Dashboard;
        self.message.clear();
    }

    /// Entra en un submódulo: si ya tiene resultado guardado se muestra
    /// directamente, si no se pasa por la pantalla de instrucciones.
    pub fn abrir_quiz(&mut self, tutorial_id: u32) {
        self.descartar_red_pendiente();
        if let Some(result) = self.cache.get(tutorial_id) {
            self.last_result = Some(result);
            self.session = QuizSession::new(QuizKind::Formative);
            self.session.tutorial_id = Some(tutorial_id);
            self.state = AppState::QuizResults;
        } else {
            self.session = QuizSession::new(QuizKind::Formative);
            self.session.tutorial_id = Some(tutorial_id);
            self.state = AppState::QuizIntro;
        }
        self.message.clear();
    }

    pub fn abrir_quiz_final(&mut self) {
        self.descartar_red_pendiente();
        if let Some(result) = self.cache.get_final() {
            self.final_result = Some(result);
            self.state = AppState::FinalResults;
        } else {
            self.state = AppState::FinalIntro;
        }
        self.message.clear();
    }

    /// Vuelta al material del curso: dentro de un iframe se delega en la
    /// plataforma; en standalone se va a la bienvenida.
    pub fn volver_al_material(&mut self) {
        if self.embedded {
            crate::embed::post_nav_parent("material");
        }
        self.ir_a_bienvenida();
    }
}
