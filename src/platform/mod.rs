//! Platform abstraction layer
//!
//! Everything a game needs from its host, kept free of browser types:
//! - Input events (keys, pointer, touch, on-screen controls)
//! - Update scheduling (fixed interval, animation frames)
//! - The terminal the games report to
//! - Mounting a game surface into the page

pub mod headless;
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::games::Game;

pub use headless::HeadlessHost;
pub use session::Session;

/// Keyboard key, as far as the games care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }

    /// Character keys compared case-insensitively
    pub fn is_char(self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Action behind an on-screen control button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAction {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Spin,
    BetDown,
    BetUp,
}

/// On-screen button the host renders below the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlButton {
    pub action: ControlAction,
    pub label: &'static str,
    pub aria_label: &'static str,
    /// Sends press and release (held movement) instead of a single tap
    pub hold: bool,
}

impl ControlButton {
    pub const fn tap(action: ControlAction, label: &'static str, aria_label: &'static str) -> Self {
        Self {
            action,
            label,
            aria_label,
            hold: false,
        }
    }

    pub const fn hold(action: ControlAction, label: &'static str, aria_label: &'static str) -> Self {
        Self {
            action,
            label,
            aria_label,
            hold: true,
        }
    }
}

/// Input delivered to a running game; coordinates are canvas-relative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    ControlPressed(ControlAction),
    ControlReleased(ControlAction),
}

/// Environment facts queried once by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Show on-screen controls and touch-worded prompts
    pub touch_controls: bool,
}

/// How the host should call [`Game::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Schedule {
    /// Repeating timer
    Interval(u32),
    /// Every animation frame
    Frames,
    /// Nothing pending until the next input
    Idle,
}

/// Where styled output lines go
pub trait Terminal {
    /// Append one line of terminal markup
    fn print(&mut self, html: &str);
}

pub type SharedTerminal = Rc<RefCell<dyn Terminal>>;

/// Terminal that keeps printed lines in memory
#[derive(Debug, Clone, Default)]
pub struct BufferTerminal {
    pub lines: Vec<String>,
}

impl BufferTerminal {
    pub fn shared() -> Rc<RefCell<BufferTerminal>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Printed lines with markup and surrounding blank lines stripped
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| strip_tags(line).trim().to_string())
            .collect()
    }
}

impl Terminal for BufferTerminal {
    fn print(&mut self, html: &str) {
        self.lines.push(html.to_string());
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Host side of the game lifecycle
///
/// `mount` attaches a surface for the game and starts it; `unmount` stops
/// whatever game is active. Both are safe to call repeatedly.
pub trait Mount {
    fn capabilities(&self) -> Capabilities;
    fn mount(&mut self, game: Box<dyn Game>) -> Result<()>;
    fn unmount(&mut self);
}
