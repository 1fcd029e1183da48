//! Snake engine

use glam::Vec2;

use super::{Game, GameKind};
use crate::config::SnakeConfig;
use crate::highscores::HighScore;
use crate::notice::{Notice, Outbox, Tone};
use crate::persistence::{SharedStore, keys};
use crate::platform::{Capabilities, ControlAction, ControlButton, InputEvent, Key, Schedule};
use crate::renderer::{self, DrawOptions, DrawSurface};
use crate::rng::RandomSource;
use crate::sim::snake::{self, Direction, SnakeEvent, SnakeState};

pub struct SnakeGame {
    state: SnakeState,
    high_score: HighScore,
    rng: Box<dyn RandomSource>,
    capabilities: Capabilities,
    outbox: Outbox,
    /// Where the current touch began, for swipe detection
    touch_start: Option<Vec2>,
    running: bool,
}

impl SnakeGame {
    pub fn new(
        config: SnakeConfig,
        store: SharedStore,
        mut rng: Box<dyn RandomSource>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            state: SnakeState::new(config, rng.as_mut()),
            high_score: HighScore::load(store, keys::SNAKE_HIGH_SCORE),
            rng,
            capabilities,
            outbox: Outbox::default(),
            touch_start: None,
            running: false,
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    fn quit(&mut self) {
        self.stop();
        self.outbox.send(
            Notice::line(Tone::Muted, "Game ended. Type \"snake\" to play again!")
                .spaced_before()
                .spaced_after(),
        );
    }

    fn game_over(&mut self) {
        self.running = false;
        let score = self.state.score;

        self.outbox.send(
            Notice::new()
                .error("Game Over!")
                .plain(" Final Score: ")
                .accent(score.to_string())
                .spaced_before(),
        );
        if self.high_score.is_record(score) {
            self.outbox.send(Notice::line(Tone::Success, "New High Score!"));
        }
        self.outbox.send(
            Notice::line(Tone::Muted, "Type \"snake\" to play again").spaced_after(),
        );
    }

    fn swipe(&mut self, end: Vec2) -> bool {
        let Some(start) = self.touch_start.take() else {
            return false;
        };
        let delta = end - start;
        match Direction::from_swipe(delta.x, delta.y, self.state.config.min_swipe_distance) {
            Some(dir) => {
                self.state.queue_direction(dir);
                true
            }
            None => false,
        }
    }
}

fn key_direction(key: Key) -> Option<Direction> {
    match key {
        Key::Up => Some(Direction::Up),
        Key::Down => Some(Direction::Down),
        Key::Left => Some(Direction::Left),
        Key::Right => Some(Direction::Right),
        k if k.is_char('w') => Some(Direction::Up),
        k if k.is_char('s') => Some(Direction::Down),
        k if k.is_char('a') => Some(Direction::Left),
        k if k.is_char('d') => Some(Direction::Right),
        _ => None,
    }
}

fn control_direction(action: ControlAction) -> Option<Direction> {
    match action {
        ControlAction::Up => Some(Direction::Up),
        ControlAction::Down => Some(Direction::Down),
        ControlAction::Left => Some(Direction::Left),
        ControlAction::Right => Some(Direction::Right),
        _ => None,
    }
}

impl Game for SnakeGame {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn surface_size(&self) -> (u32, u32) {
        let size = self.state.config.canvas_size();
        (size, size)
    }

    fn start(&mut self, _now_ms: f64) {
        if self.running || self.state.over {
            return;
        }
        self.running = true;
        log::info!("Snake started (best {})", self.high_score.best());
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
            InputEvent::KeyDown(Key::Space) | InputEvent::ControlPressed(ControlAction::Pause) => {
                self.state.toggle_pause();
                true
            }
            InputEvent::KeyDown(key) => match key_direction(key) {
                Some(dir) => {
                    self.state.queue_direction(dir);
                    true
                }
                None => false,
            },
            InputEvent::ControlPressed(action) => match control_direction(action) {
                Some(dir) => {
                    self.state.queue_direction(dir);
                    true
                }
                None => false,
            },
            InputEvent::TouchStart { x, y } => {
                self.touch_start = Some(Vec2::new(x, y));
                false
            }
            InputEvent::TouchEnd { x, y } => self.swipe(Vec2::new(x, y)),
            InputEvent::KeyUp(_)
            | InputEvent::ControlReleased(_)
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerDown { .. }
            | InputEvent::TouchMove { .. } => false,
        }
    }

    fn update(&mut self, _now_ms: f64) {
        if !self.running {
            return;
        }

        for event in snake::tick(&mut self.state, self.rng.as_mut()) {
            match event {
                SnakeEvent::Ate { score } => {
                    self.high_score.submit(score);
                }
                SnakeEvent::SpeedUp { interval_ms } => {
                    log::debug!("Snake speed up: {} ms", interval_ms);
                }
                SnakeEvent::Died { cause } => {
                    log::debug!("Snake died: {:?}", cause);
                    self.game_over();
                }
            }
        }
    }

    fn schedule(&self) -> Schedule {
        if self.running {
            Schedule::Interval(self.state.interval_ms)
        } else {
            Schedule::Idle
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let options = DrawOptions {
            touch_controls: self.capabilities.touch_controls,
            new_record: self.state.over && self.high_score.is_record(self.state.score),
        };
        renderer::snake::draw(&self.state, options, surface);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.touch_start = None;
        log::info!("Snake stopped");
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    fn controls(&self) -> Vec<ControlButton> {
        if !self.capabilities.touch_controls {
            return Vec::new();
        }
        vec![
            ControlButton::tap(ControlAction::Up, "↑", "Move up"),
            ControlButton::tap(ControlAction::Left, "←", "Move left"),
            ControlButton::tap(ControlAction::Pause, "⏸", "Pause"),
            ControlButton::tap(ControlAction::Right, "→", "Move right"),
            ControlButton::tap(ControlAction::Down, "↓", "Move down"),
        ]
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Score", self.state.score.to_string()),
            ("High Score", self.high_score.best().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, ScoreStore};
    use crate::rng::ScriptedSource;
    use crate::sim::{Cell, SnakePhase};

    /// Food starts at (0, 0); later draws land on (7, 7), a body cell, then (0, 0)
    fn game(store: SharedStore) -> SnakeGame {
        SnakeGame::new(
            SnakeConfig::default(),
            store,
            Box::new(ScriptedSource::new(vec![0.0, 0.0, 0.5, 0.5])),
            Capabilities::default(),
        )
    }

    fn texts(notices: &[Notice]) -> Vec<String> {
        notices.iter().map(Notice::text).collect()
    }

    #[test]
    fn test_idle_until_first_direction() {
        let mut g = game(MemoryStore::shared());
        g.start(0.0);
        assert_eq!(g.schedule(), Schedule::Interval(100));
        g.update(100.0);
        assert_eq!(g.state().phase(), SnakePhase::Idle);

        assert!(g.handle_input(&InputEvent::KeyDown(Key::Char('d')), 150.0));
        g.update(200.0);
        assert_eq!(g.state().phase(), SnakePhase::Moving);
        assert_eq!(g.state().head(), Cell::new(8, 7));
    }

    #[test]
    fn test_eating_reschedules_and_persists() {
        let store = MemoryStore::shared();
        let mut g = game(store.clone());
        g.start(0.0);
        g.state.food = Cell::new(8, 7);
        g.handle_input(&InputEvent::KeyDown(Key::Right), 0.0);
        g.update(100.0);

        assert_eq!(g.state().len(), 4);
        assert_eq!(g.state().score, 10);
        assert!(!g.state().body.contains(&g.state().food));
        assert_eq!(g.schedule(), Schedule::Interval(98));
        assert_eq!(store.borrow().get(keys::SNAKE_HIGH_SCORE).as_deref(), Some("10"));
        assert_eq!(g.status()[1], ("High Score", "10".to_string()));
    }

    #[test]
    fn test_wall_death_reports() {
        let mut g = game(MemoryStore::shared());
        g.start(0.0);
        g.handle_input(&InputEvent::ControlPressed(ControlAction::Up), 0.0);
        for i in 0..8 {
            g.update(i as f64 * 100.0);
        }
        assert!(!g.is_running());
        assert_eq!(g.schedule(), Schedule::Idle);
        assert_eq!(
            texts(&g.take_notices()),
            vec!["Game Over! Final Score: 0", "Type \"snake\" to play again"]
        );
    }

    #[test]
    fn test_swipe_queues_direction() {
        let mut g = game(MemoryStore::shared());
        g.start(0.0);

        g.handle_input(&InputEvent::TouchStart { x: 100.0, y: 100.0 }, 0.0);
        // A tap is not a swipe
        assert!(!g.handle_input(&InputEvent::TouchEnd { x: 110.0, y: 105.0 }, 0.0));
        assert_eq!(g.state().next_direction, None);

        g.handle_input(&InputEvent::TouchStart { x: 100.0, y: 100.0 }, 0.0);
        assert!(g.handle_input(&InputEvent::TouchEnd { x: 95.0, y: 20.0 }, 0.0));
        assert_eq!(g.state().next_direction, Some(Direction::Up));

        // End without a start is ignored
        assert!(!g.handle_input(&InputEvent::TouchEnd { x: 0.0, y: 0.0 }, 0.0));
    }

    #[test]
    fn test_escape_and_stop_are_idempotent() {
        let mut g = game(MemoryStore::shared());
        g.start(0.0);
        g.handle_input(&InputEvent::KeyDown(Key::Escape), 0.0);
        assert_eq!(
            texts(&g.take_notices()),
            vec!["Game ended. Type \"snake\" to play again!"]
        );
        g.stop();
        g.stop();
        assert!(!g.handle_input(&InputEvent::KeyDown(Key::Up), 0.0));
        g.update(1000.0);
        assert_eq!(g.state().head(), Cell::new(7, 7));
        assert!(g.take_notices().is_empty());
    }

    #[test]
    fn test_dpad_on_touch() {
        let g = SnakeGame::new(
            SnakeConfig::default(),
            MemoryStore::shared(),
            Box::new(ScriptedSource::constant(0.0)),
            Capabilities {
                touch_controls: true,
            },
        );
        let labels: Vec<_> = g.controls().iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["↑", "←", "⏸", "→", "↓"]);
    }
}
