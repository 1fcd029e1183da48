//! Headless host
//!
//! Runs a game against a virtual clock and a recording surface. Used by the
//! native binary and by tests that drive a whole game through its host.

use super::{Capabilities, InputEvent, Mount, Schedule, Session, SharedTerminal};
use crate::error::Result;
use crate::games::Game;
use crate::renderer::RecordingSurface;

/// Animation frame period on the virtual clock
pub const FRAME_MS: f64 = 16.0;

/// Delay before the terminal input gets focus back
pub const REFOCUS_DELAY_MS: f64 = 100.0;

pub struct HeadlessHost {
    terminal: SharedTerminal,
    capabilities: Capabilities,
    clock: f64,
    session: Option<Session<RecordingSurface>>,
    /// Schedule currently installed for the session
    installed: Schedule,
    next_due: Option<f64>,
    refocus_at: Option<f64>,
    input_focused: bool,
    fired: u64,
}

impl HeadlessHost {
    pub fn new(terminal: SharedTerminal, capabilities: Capabilities) -> Self {
        Self {
            terminal,
            capabilities,
            clock: 0.0,
            session: None,
            installed: Schedule::Idle,
            next_due: None,
            refocus_at: None,
            input_focused: true,
            fired: 0,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Most recent session, alive or not; its surface keeps the last frame
    pub fn session(&self) -> Option<&Session<RecordingSurface>> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_alive)
    }

    pub fn installed(&self) -> Schedule {
        self.installed
    }

    /// Whether the terminal input currently has focus
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Scheduled callbacks fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Run the clock forward, firing every callback that comes due
    pub fn advance(&mut self, ms: f64) {
        let target = self.clock + ms.max(0.0);
        while let Some(due) = self.next_due.filter(|due| *due <= target) {
            self.clock = due;
            self.check_refocus();
            let Some(session) = self.session.as_mut() else {
                self.next_due = None;
                break;
            };
            self.fired += 1;
            let schedule = session.fire(due);
            self.install(schedule);
            self.after_callback();
        }
        self.clock = target;
        self.check_refocus();
    }

    /// Deliver input at the current clock; returns whether it was consumed
    pub fn send(&mut self, event: InputEvent) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let consumed = session.dispatch(&event, self.clock);
        let schedule = session.schedule();
        if schedule != self.installed {
            self.install(schedule);
        }
        self.after_callback();
        consumed
    }

    /// Replace the installed schedule, measured from the current clock
    fn install(&mut self, schedule: Schedule) {
        self.installed = schedule;
        self.next_due = match schedule {
            Schedule::Interval(ms) => Some(self.clock + f64::from(ms.max(1))),
            Schedule::Frames => Some(self.clock + FRAME_MS),
            Schedule::Idle => None,
        };
    }

    fn after_callback(&mut self) {
        if self.session.as_ref().is_some_and(|s| !s.is_alive()) {
            self.teardown();
        }
    }

    /// Cancel the schedule and queue the input refocus. Idempotent.
    fn teardown(&mut self) {
        self.installed = Schedule::Idle;
        self.next_due = None;
        if !self.input_focused && self.refocus_at.is_none() {
            self.refocus_at = Some(self.clock + REFOCUS_DELAY_MS);
        }
    }

    fn check_refocus(&mut self) {
        if self.refocus_at.is_some_and(|at| at <= self.clock) {
            self.refocus_at = None;
            self.input_focused = true;
        }
    }
}

impl Mount for HeadlessHost {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn mount(&mut self, game: Box<dyn Game>) -> Result<()> {
        self.unmount();

        let (width, height) = game.surface_size();
        let kind = game.kind();
        let surface = RecordingSurface::new(width as f32, height as f32);
        let mut session = Session::new(game, surface, self.terminal.clone());

        if self.capabilities.touch_controls {
            self.input_focused = false;
            self.refocus_at = None;
        }
        let schedule = session.start(self.clock);
        self.session = Some(session);
        self.install(schedule);
        self.after_callback();
        log::info!("Mounted {} ({}x{})", kind, width, height);
        Ok(())
    }

    fn unmount(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_alive() {
            session.stop();
        }
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BreakoutConfig, SnakeConfig};
    use crate::games::{BreakoutGame, SnakeGame};
    use crate::persistence::MemoryStore;
    use crate::platform::{BufferTerminal, ControlAction, Key};
    use crate::rng::ScriptedSource;

    fn snake(values: Vec<f64>, capabilities: Capabilities) -> Box<dyn Game> {
        Box::new(SnakeGame::new(
            SnakeConfig::default(),
            MemoryStore::shared(),
            Box::new(ScriptedSource::new(values)),
            capabilities,
        ))
    }

    fn host(capabilities: Capabilities) -> HeadlessHost {
        HeadlessHost::new(BufferTerminal::shared(), capabilities)
    }

    #[test]
    fn test_no_callbacks_after_unmount() {
        let mut h = host(Capabilities::default());
        h.mount(Box::new(BreakoutGame::new(
            BreakoutConfig::default(),
            MemoryStore::shared(),
            Box::new(ScriptedSource::constant(0.5)),
            Capabilities::default(),
        )))
        .unwrap();
        assert_eq!(h.installed(), Schedule::Interval(16));

        h.advance(160.0);
        assert_eq!(h.fired(), 10);

        h.unmount();
        h.unmount();
        h.advance(1000.0);
        assert_eq!(h.fired(), 10);
        assert!(!h.is_active());
        assert!(!h.send(InputEvent::KeyDown(Key::Space)));
    }

    #[test]
    fn test_interval_follows_snake_speed() {
        // First food lands right in front of the head, the next one in the corner
        let mut h = host(Capabilities::default());
        h.mount(snake(vec![0.54, 0.5, 0.0, 0.0], Capabilities::default()))
            .unwrap();
        assert_eq!(h.installed(), Schedule::Interval(100));

        assert!(h.send(InputEvent::KeyDown(Key::Right)));
        h.advance(100.0);
        assert_eq!(h.fired(), 1);
        assert_eq!(h.installed(), Schedule::Interval(98));

        h.advance(97.0);
        assert_eq!(h.fired(), 1);
        h.advance(1.0);
        assert_eq!(h.fired(), 2);
    }

    #[test]
    fn test_game_over_keeps_final_frame_and_refocuses() {
        let touch = Capabilities {
            touch_controls: true,
        };
        let mut h = host(touch);
        h.mount(snake(vec![0.0], touch)).unwrap();
        assert!(!h.input_focused());

        h.send(InputEvent::ControlPressed(ControlAction::Up));
        h.advance(800.0);
        assert!(!h.is_active());
        assert_eq!(h.installed(), Schedule::Idle);
        assert_eq!(h.fired(), 8);

        let session = h.session().unwrap();
        assert!(session.surface().contains_text("GAME OVER"));

        assert!(!h.input_focused());
        h.advance(100.0);
        assert!(h.input_focused());
    }

    #[test]
    fn test_mount_replaces_running_game() {
        let terminal = BufferTerminal::shared();
        let mut h = HeadlessHost::new(terminal.clone(), Capabilities::default());
        h.mount(snake(vec![0.0], Capabilities::default())).unwrap();
        h.mount(snake(vec![0.0], Capabilities::default())).unwrap();
        assert!(h.is_active());
        assert!(terminal.borrow().lines.is_empty());
        h.advance(250.0);
        assert_eq!(h.fired(), 2);
    }
}
