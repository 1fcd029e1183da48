//! Grid snake
//!
//! The body is a contiguous run of cells, head first. Each tick commits the
//! queued direction, steps the head and either grows (food) or drops the tail.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::SnakeConfig;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step; y grows downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction of a swipe, or `None` if it travelled less than `min`
    /// on both axes
    pub fn from_swipe(dx: f32, dy: f32, min: f32) -> Option<Self> {
        if dx.abs() < min && dy.abs() < min {
            return None;
        }
        Some(if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakePhase {
    /// No direction yet, the snake waits
    Idle,
    Moving,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfHit,
    /// No free cell left for food
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnakeEvent {
    Ate { score: u64 },
    /// Tick interval changed; the host must reschedule
    SpeedUp { interval_ms: u32 },
    Died { cause: DeathCause },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeState {
    pub config: SnakeConfig,
    /// Head first
    pub body: VecDeque<Cell>,
    pub food: Cell,
    pub direction: Option<Direction>,
    pub next_direction: Option<Direction>,
    pub score: u64,
    pub interval_ms: u32,
    pub paused: bool,
    pub over: bool,
}

impl SnakeState {
    /// Snake centred on the grid, pointing right, food placed
    pub fn new(config: SnakeConfig, rng: &mut dyn RandomSource) -> Self {
        let center = config.tile_count / 2;
        let body = (0..config.initial_length as i32)
            .map(|i| Cell::new(center - i, center))
            .collect();

        let mut state = Self {
            food: Cell::new(0, 0),
            body,
            direction: None,
            next_direction: None,
            score: 0,
            interval_ms: config.interval_ms,
            paused: false,
            over: false,
            config,
        };
        if !state.place_food(rng) {
            state.over = true;
        }
        state
    }

    pub fn phase(&self) -> SnakePhase {
        if self.over {
            SnakePhase::GameOver
        } else if self.paused {
            SnakePhase::Paused
        } else if self.direction.is_none() {
            SnakePhase::Idle
        } else {
            SnakePhase::Moving
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        let n = self.config.tile_count;
        (0..n).contains(&cell.x) && (0..n).contains(&cell.y)
    }

    /// Queue a turn for the next tick
    ///
    /// A direct reversal of the committed direction is rejected.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if self.over {
            return false;
        }
        if self.direction.is_some_and(|current| dir == current.opposite()) {
            return false;
        }
        self.next_direction = Some(dir);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Move food to a uniformly random free cell
    ///
    /// Rejection-sampled against the body. Returns false when the board is
    /// full and there is nowhere to put it.
    pub fn place_food(&mut self, rng: &mut dyn RandomSource) -> bool {
        let n = self.config.tile_count.max(0) as u32;
        if self.body.len() >= (n * n) as usize {
            return false;
        }
        loop {
            let cell = Cell::new(rng.below(n) as i32, rng.below(n) as i32);
            if !self.body.contains(&cell) {
                self.food = cell;
                return true;
            }
        }
    }
}

/// Advance the snake by one tick
pub fn tick(state: &mut SnakeState, rng: &mut dyn RandomSource) -> Vec<SnakeEvent> {
    let mut events = Vec::new();
    if state.over || state.paused {
        return events;
    }

    if let Some(next) = state.next_direction {
        state.direction = Some(next);
    }
    let Some(dir) = state.direction else {
        return events;
    };

    let head = state.head().step(dir);
    let cause = if !state.in_bounds(head) {
        Some(DeathCause::Wall)
    } else if state.body.contains(&head) {
        Some(DeathCause::SelfHit)
    } else {
        None
    };
    if let Some(cause) = cause {
        state.over = true;
        events.push(SnakeEvent::Died { cause });
        log::info!("Snake over ({:?}): score {}", cause, state.score);
        return events;
    }

    state.body.push_front(head);

    if head == state.food {
        state.score += state.config.points_per_food;
        events.push(SnakeEvent::Ate { score: state.score });

        if state.interval_ms > state.config.min_interval_ms {
            state.interval_ms = state
                .interval_ms
                .saturating_sub(state.config.interval_step_ms)
                .max(state.config.min_interval_ms);
            events.push(SnakeEvent::SpeedUp {
                interval_ms: state.interval_ms,
            });
        }

        if !state.place_food(rng) {
            state.over = true;
            events.push(SnakeEvent::Died {
                cause: DeathCause::BoardFull,
            });
        }
    } else {
        state.body.pop_back();
    }

    events
}
