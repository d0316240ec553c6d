use super::*;

impl QuizApp {
    /// Repetir un quiz de submódulo: borra resultado y snapshot para que
    /// no salte la detección de "ya completado" y recarga las preguntas.
    pub fn reintentar_quiz(&mut self) {
        let tid = match self.session.tutorial_id {
            Some(t) => t,
            None => return,
        };
        self.cache.clear(tid);
        self.last_result = None;
        self.session = QuizSession::new(QuizKind::Formative);
        self.session.tutorial_id = Some(tid);
        self.empezar_quiz();
    }

    /// El quiz final se puede repetir sin borrar nada: el nuevo intento
    /// sobrescribe el resultado guardado.
    pub fn reintentar_quiz_final(&mut self) {
        self.final_result = None;
        self.empezar_quiz_final();
    }

    /// Reintento tras un fallo de carga (solo el final llega aquí; el
    /// formativo cae al banco mock y nunca queda en Failed)
    pub fn reintentar_carga(&mut self) {
        match self.session.kind {
            QuizKind::Formative => self.empezar_quiz(),
            QuizKind::Summative => self.empezar_quiz_final(),
        }
    }

    /// Reintento tras un fallo de envío. Si el tiempo global ya venció,
    /// se mantiene el envío forzado.
    pub fn reintentar_envio(&mut self, now: f64) {
        let force = self.timer.remaining_secs() == 0;
        self.enviar_respuestas(force, now);
    }
}
