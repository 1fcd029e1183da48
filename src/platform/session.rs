//! One running game on one surface
//!
//! Every host callback (start, input, timer, frame) goes through the
//! session. It checks liveness first, flushes queued notices to the terminal
//! afterwards and redraws. When a callback ends the game the session draws
//! one final frame and goes dead; nothing reaches the game after that.

use super::{ControlButton, InputEvent, Schedule, SharedTerminal};
use crate::games::{Game, GameKind};
use crate::renderer::DrawSurface;

pub struct Session<S: DrawSurface> {
    game: Box<dyn Game>,
    surface: S,
    terminal: SharedTerminal,
    started: bool,
    alive: bool,
}

impl<S: DrawSurface> Session<S> {
    pub fn new(game: Box<dyn Game>, surface: S, terminal: SharedTerminal) -> Self {
        Self {
            game,
            surface,
            terminal,
            started: false,
            alive: true,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// What the host should have installed right now
    pub fn schedule(&self) -> Schedule {
        if self.alive {
            self.game.schedule()
        } else {
            Schedule::Idle
        }
    }

    /// Start the game and draw the first frame. Only the first call counts.
    pub fn start(&mut self, now_ms: f64) -> Schedule {
        if !self.alive || self.started {
            return self.schedule();
        }
        self.started = true;
        self.game.start(now_ms);
        self.settle()
    }

    /// Deliver one input event; returns whether the game consumed it
    pub fn dispatch(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        if !self.alive {
            return false;
        }
        let consumed = self.game.handle_input(event, now_ms);
        self.settle();
        consumed
    }

    /// Scheduled tick or animation frame
    pub fn fire(&mut self, now_ms: f64) -> Schedule {
        if !self.alive {
            return Schedule::Idle;
        }
        self.game.update(now_ms);
        self.settle()
    }

    /// External cancel. Idempotent; no draw afterwards.
    pub fn stop(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.game.stop();
        self.flush();
        log::debug!("Session for {} stopped", self.game.kind());
    }

    pub fn controls(&self) -> Vec<ControlButton> {
        self.game.controls()
    }

    pub fn status(&self) -> Vec<(&'static str, String)> {
        self.game.status()
    }

    fn settle(&mut self) -> Schedule {
        self.flush();
        self.game.draw(&mut self.surface);
        if !self.game.is_running() {
            self.alive = false;
            log::debug!("Session for {} ended", self.game.kind());
        }
        self.schedule()
    }

    fn flush(&mut self) {
        let notices = self.game.take_notices();
        if notices.is_empty() {
            return;
        }
        let mut terminal = self.terminal.borrow_mut();
        for notice in notices {
            terminal.print(&notice.to_html());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnakeConfig;
    use crate::games::SnakeGame;
    use crate::persistence::MemoryStore;
    use crate::platform::{BufferTerminal, Capabilities, Key};
    use crate::renderer::RecordingSurface;
    use crate::rng::ScriptedSource;

    fn session() -> (Session<RecordingSurface>, std::rc::Rc<std::cell::RefCell<BufferTerminal>>) {
        let terminal = BufferTerminal::shared();
        let game = SnakeGame::new(
            SnakeConfig::default(),
            MemoryStore::shared(),
            Box::new(ScriptedSource::constant(0.0)),
            Capabilities::default(),
        );
        let session = Session::new(
            Box::new(game),
            RecordingSurface::new(300.0, 300.0),
            terminal.clone(),
        );
        (session, terminal)
    }

    #[test]
    fn test_start_draws_once() {
        let (mut s, _) = session();
        assert_eq!(s.start(0.0), Schedule::Interval(100));
        assert!(s.surface().contains_text("Press arrow keys to start"));
        let drawn = s.surface().commands.len();
        assert_eq!(s.start(10.0), Schedule::Interval(100));
        assert_eq!(s.surface().commands.len(), drawn);
    }

    #[test]
    fn test_game_over_draws_final_frame_and_goes_dead() {
        let (mut s, terminal) = session();
        s.start(0.0);
        s.dispatch(&InputEvent::KeyDown(Key::Up), 0.0);
        for i in 1..=8 {
            s.surface_mut().clear_commands();
            s.fire(i as f64 * 100.0);
        }
        assert!(!s.is_alive());
        assert_eq!(s.schedule(), Schedule::Idle);
        assert!(s.surface().contains_text("GAME OVER"));
        assert_eq!(terminal.borrow().plain_lines()[0], "Game Over! Final Score: 0");

        s.surface_mut().clear_commands();
        assert_eq!(s.fire(900.0), Schedule::Idle);
        assert!(!s.dispatch(&InputEvent::KeyDown(Key::Left), 900.0));
        assert!(s.surface().commands.is_empty());
    }

    #[test]
    fn test_stop_is_idempotent_and_silent() {
        let (mut s, terminal) = session();
        s.start(0.0);
        s.surface_mut().clear_commands();
        s.stop();
        s.stop();
        assert!(!s.is_alive());
        assert_eq!(s.fire(100.0), Schedule::Idle);
        assert!(s.surface().commands.is_empty());
        assert!(terminal.borrow().lines.is_empty());
    }

    #[test]
    fn test_escape_from_handler_prints_and_ends() {
        let (mut s, terminal) = session();
        s.start(0.0);
        assert!(s.dispatch(&InputEvent::KeyDown(Key::Escape), 5.0));
        assert!(!s.is_alive());
        assert_eq!(
            terminal.borrow().plain_lines(),
            vec!["Game ended. Type \"snake\" to play again!"]
        );
    }
}
