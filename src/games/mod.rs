//! Game engines
//!
//! Each engine owns one simulation from [`crate::sim`], turns host input
//! into simulation calls and reacts to the events it returns: persisting
//! scores, queueing terminal notices and changing its schedule.

pub mod breakout;
pub mod slots;
pub mod snake;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::platform::{ControlButton, InputEvent, Schedule};
use crate::renderer::DrawSurface;

pub use breakout::BreakoutGame;
pub use slots::SlotMachineGame;
pub use snake::SnakeGame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Breakout,
    Snake,
    Slots,
}

impl GameKind {
    /// Resolve a terminal command name
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_ascii_lowercase().as_str() {
            "breakout" => Some(GameKind::Breakout),
            "snake" => Some(GameKind::Snake),
            "slots" | "slot" => Some(GameKind::Slots),
            _ => None,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            GameKind::Breakout => "breakout",
            GameKind::Snake => "snake",
            GameKind::Slots => "slots",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Lifecycle every engine implements
///
/// The host calls `start` once, then feeds input and scheduled updates until
/// `is_running` turns false. `stop` may come at any point, more than once,
/// and after it no call may change state.
pub trait Game {
    fn kind(&self) -> GameKind;

    /// Canvas size in pixels
    fn surface_size(&self) -> (u32, u32);

    fn start(&mut self, now_ms: f64);

    /// Apply one input event. Returns true if it was consumed.
    fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool;

    /// One scheduled tick or animation frame
    fn update(&mut self, now_ms: f64);

    fn schedule(&self) -> Schedule;

    /// Render the current state; never mutates it
    fn draw(&self, surface: &mut dyn DrawSurface);

    fn is_running(&self) -> bool;

    /// End the game. Idempotent.
    fn stop(&mut self);

    /// Notices queued since the last call
    fn take_notices(&mut self) -> Vec<Notice>;

    /// On-screen buttons, in display order
    fn controls(&self) -> Vec<ControlButton>;

    /// Info line below the canvas as `(label, value)` pairs
    fn status(&self) -> Vec<(&'static str, String)>;
}
