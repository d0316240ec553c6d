// src/timer.rs
//
// Cuenta atrás en segundos enteros para el quiz. El host la alimenta con
// `tick(now)` en cada frame (egui repinta solo, no hay hilo propio).

/// Temporizador de cuenta atrás. Dispara su vencimiento exactamente una
/// vez al llegar a cero; `reset` sustituye cualquier cuenta anterior.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    remaining: u32,
    active: bool,
    fired: bool,
    last_tick: Option<f64>, // epoch en segundos del último decremento
}

impl CountdownTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            active: true,
            fired: false,
            last_tick: None,
        }
    }

    /// Reinicia a una nueva duración (p. ej. nueva pregunta). Descarta
    /// el estado de la cuenta anterior para no duplicar vencimientos.
    pub fn reset(&mut self, duration_secs: u32) {
        self.remaining = duration_secs;
        self.active = true;
        self.fired = false;
        self.last_tick = None;
    }

    /// Pausar (active=false) congela el tiempo restante
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            // Al reanudar no se descuenta el tiempo en pausa
            self.last_tick = None;
        }
        self.active = active;
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Quedan pocos segundos: la UI lo pinta en aviso
    pub fn is_warning(&self) -> bool {
        self.remaining <= 10
    }

    /// Avanza la cuenta según `now` (epoch en segundos). Devuelve true
    /// exactamente una vez, en el tick en que llega a cero.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.active || self.fired {
            return false;
        }
        let last = match self.last_tick {
            Some(t) => t,
            None => {
                self.last_tick = Some(now);
                return false;
            }
        };
        let elapsed = (now - last).floor();
        if elapsed < 1.0 {
            return false;
        }
        self.last_tick = Some(last + elapsed);
        self.remaining = self.remaining.saturating_sub(elapsed as u32);
        if self.remaining == 0 {
            self.fired = true;
            self.active = false;
            return true;
        }
        false
    }

    /// Formato m:ss para la cabecera del quiz
    pub fn format(&self) -> String {
        let m = self.remaining / 60;
        let s = self.remaining % 60;
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::CountdownTimer;

    #[test]
    fn fires_exactly_once_at_zero() {
        let mut t = CountdownTimer::new(3);
        assert!(!t.tick(100.0)); // primer tick fija la referencia
        assert!(!t.tick(101.0));
        assert!(!t.tick(102.0));
        assert!(t.tick(103.0)); // llega a cero
        assert!(!t.tick(104.0)); // nunca vuelve a disparar
        assert_eq!(t.remaining_secs(), 0);
        assert!(!t.is_active());
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut t = CountdownTimer::new(10);
        t.tick(100.0);
        t.tick(102.0);
        assert_eq!(t.remaining_secs(), 8);

        t.set_active(false);
        assert!(!t.tick(150.0)); // en pausa no descuenta
        assert_eq!(t.remaining_secs(), 8);

        t.set_active(true);
        t.tick(200.0); // nueva referencia tras reanudar
        t.tick(201.0);
        assert_eq!(t.remaining_secs(), 7);
    }

    #[test]
    fn reset_discards_previous_countdown() {
        let mut t = CountdownTimer::new(2);
        t.tick(100.0);
        t.tick(101.0);
        t.reset(30);
        assert_eq!(t.remaining_secs(), 30);
        assert!(!t.tick(102.0));
        assert!(!t.tick(103.0));
        assert_eq!(t.remaining_secs(), 29);
    }

    #[test]
    fn big_jump_fires_once() {
        let mut t = CountdownTimer::new(5);
        t.tick(100.0);
        assert!(t.tick(500.0)); // un salto grande consume todo el resto
        assert!(!t.tick(501.0));
    }

    #[test]
    fn format_minutes_and_seconds() {
        let t = CountdownTimer::new(600);
        assert_eq!(t.format(), "10:00");
        let t = CountdownTimer::new(65);
        assert_eq!(t.format(), "1:05");
        let t = CountdownTimer::new(9);
        assert_eq!(t.format(), "0:09");
        assert!(t.is_warning());
    }
}
