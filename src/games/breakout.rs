//! Breakout engine
//!
//! Fixed-interval ticks drive [`crate::sim::breakout::tick`]. Held keys and
//! on-screen buttons set the paddle direction; pointer and touch moves
//! place the paddle directly.

use super::{Game, GameKind};
use crate::config::BreakoutConfig;
use crate::highscores::HighScore;
use crate::notice::{Notice, Outbox, Tone};
use crate::persistence::{SharedStore, keys};
use crate::platform::{Capabilities, ControlAction, ControlButton, InputEvent, Key, Schedule};
use crate::renderer::{self, DrawOptions, DrawSurface};
use crate::rng::RandomSource;
use crate::sim::breakout::{self, BreakoutEvent, BreakoutInput, BreakoutState};

pub struct BreakoutGame {
    state: BreakoutState,
    input: BreakoutInput,
    high_score: HighScore,
    rng: Box<dyn RandomSource>,
    capabilities: Capabilities,
    outbox: Outbox,
    running: bool,
}

impl BreakoutGame {
    pub fn new(
        config: BreakoutConfig,
        store: SharedStore,
        rng: Box<dyn RandomSource>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            state: BreakoutState::new(config),
            input: BreakoutInput::default(),
            high_score: HighScore::load(store, keys::BREAKOUT_HIGH_SCORE),
            rng,
            capabilities,
            outbox: Outbox::default(),
            running: false,
        }
    }

    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    fn quit(&mut self) {
        self.stop();
        self.outbox.send(
            Notice::line(Tone::Muted, "Game ended. Type \"breakout\" to play again!")
                .spaced_before()
                .spaced_after(),
        );
    }

    fn game_over(&mut self, score: u64, level: u32) {
        self.running = false;
        self.input = BreakoutInput::default();

        self.outbox.send(
            Notice::new()
                .error("Game Over!")
                .plain(" Score: ")
                .accent(score.to_string())
                .plain(" | Level: ")
                .accent(level.to_string())
                .spaced_before(),
        );
        if self.high_score.is_record(score) {
            self.outbox.send(Notice::line(Tone::Success, "New High Score!"));
        }
        self.outbox.send(
            Notice::line(Tone::Muted, "Type \"breakout\" to play again").spaced_after(),
        );
    }

    fn set_held(&mut self, action: ControlAction, held: bool) -> bool {
        match action {
            ControlAction::Left => self.input.left = held,
            ControlAction::Right => self.input.right = held,
            _ => return false,
        }
        true
    }
}

fn held_direction(key: Key) -> Option<ControlAction> {
    if key == Key::Left || key.is_char('a') {
        Some(ControlAction::Left)
    } else if key == Key::Right || key.is_char('d') {
        Some(ControlAction::Right)
    } else {
        None
    }
}

impl Game for BreakoutGame {
    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn surface_size(&self) -> (u32, u32) {
        let c = &self.state.config;
        (c.canvas_width as u32, c.canvas_height as u32)
    }

    fn start(&mut self, _now_ms: f64) {
        if self.running || self.state.is_over() {
            return;
        }
        self.state.start(self.rng.as_mut());
        self.running = true;
        log::info!("Breakout started (best {})", self.high_score.best());
    }

    fn handle_input(&mut self, event: &InputEvent, _now_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        match *event {
            InputEvent::KeyDown(Key::Escape) => {
                self.quit();
                true
            }
            InputEvent::KeyDown(Key::Space) => {
                self.state.toggle_pause();
                true
            }
            InputEvent::KeyDown(key) => match held_direction(key) {
                Some(action) => self.set_held(action, true),
                None => false,
            },
            InputEvent::KeyUp(key) => match held_direction(key) {
                Some(action) => self.set_held(action, false),
                None => false,
            },
            InputEvent::PointerMove { x, .. } | InputEvent::TouchMove { x, .. } => {
                self.state.move_paddle_to(x);
                true
            }
            InputEvent::ControlPressed(ControlAction::Pause) => {
                self.state.toggle_pause();
                true
            }
            InputEvent::ControlPressed(action) => self.set_held(action, true),
            InputEvent::ControlReleased(action) => self.set_held(action, false),
            InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. } | InputEvent::TouchEnd { .. } => {
                false
            }
        }
    }

    fn update(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }

        let events = breakout::tick(&mut self.state, &self.input, now_ms, self.rng.as_mut());
        for event in events {
            match event {
                BreakoutEvent::BrickDestroyed { .. } => {
                    self.high_score.submit(self.state.score);
                }
                BreakoutEvent::LifeLost { remaining } => {
                    log::debug!("Breakout life lost, {} left", remaining);
                }
                BreakoutEvent::LevelCleared { next_level } => {
                    log::info!("Breakout level {} cleared", next_level - 1);
                }
                BreakoutEvent::GameOver { score, level } => self.game_over(score, level),
            }
        }
    }

    fn schedule(&self) -> Schedule {
        if self.running {
            Schedule::Interval(self.state.config.update_interval_ms)
        } else {
            Schedule::Idle
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let options = DrawOptions {
            touch_controls: self.capabilities.touch_controls,
            new_record: self.state.is_over() && self.high_score.is_record(self.state.score),
        };
        renderer::breakout::draw(&self.state, options, surface);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.input = BreakoutInput::default();
        log::info!("Breakout stopped");
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    fn controls(&self) -> Vec<ControlButton> {
        if !self.capabilities.touch_controls {
            return Vec::new();
        }
        vec![
            ControlButton::hold(ControlAction::Left, "◀", "Move left"),
            ControlButton::tap(ControlAction::Pause, "⏸", "Pause"),
            ControlButton::hold(ControlAction::Right, "▶", "Move right"),
        ]
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Score", self.state.score.to_string()),
            ("Lives", self.state.lives.to_string()),
            ("Level", self.state.level.to_string()),
            ("Best", self.high_score.best().to_string()),
        ]
    }
}
