//! Paddle-and-ball brick breaker
//!
//! One fixed-interval tick moves the paddle, moves the ball, then resolves
//! collisions in a fixed order: walls, paddle, floor, bricks. The order is
//! observable when a ball qualifies for several contacts in the same tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    Rect, clamp_paddle, deflect, launch_velocity, out_of_bounds, paddle_contact, wall_contact,
};
use crate::config::BreakoutConfig;
use crate::rng::RandomSource;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BreakoutPhase {
    /// Built but not started
    Ready,
    Running,
    Paused,
    /// Level just cleared, frozen until the deadline
    LevelTransition { resume_at_ms: f64 },
    /// Out of lives (terminal)
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Held directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakoutInput {
    pub left: bool,
    pub right: bool,
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BreakoutEvent {
    BrickDestroyed { column: usize, row: usize, points: u64 },
    LifeLost { remaining: u32 },
    LevelCleared { next_level: u32 },
    GameOver { score: u64, level: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutState {
    pub config: BreakoutConfig,
    pub phase: BreakoutPhase,
    /// Left edge of the paddle
    pub paddle_x: f32,
    pub ball: Ball,
    /// Indexed `[column][row]`
    pub bricks: Vec<Vec<Brick>>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl BreakoutState {
    pub fn new(config: BreakoutConfig) -> Self {
        let bricks = build_bricks(&config);
        Self {
            paddle_x: (config.canvas_width - config.paddle_width) / 2.0,
            ball: Ball {
                pos: Vec2::new(config.canvas_width / 2.0, config.canvas_height - 40.0),
                vel: Vec2::ZERO,
                radius: config.ball_radius,
            },
            bricks,
            score: 0,
            lives: config.lives,
            level: 1,
            phase: BreakoutPhase::Ready,
            config,
        }
    }

    /// Launch the first ball
    pub fn start(&mut self, rng: &mut dyn RandomSource) {
        if self.phase == BreakoutPhase::Ready {
            self.reset_ball(rng);
            self.phase = BreakoutPhase::Running;
        }
    }

    /// Pause toggle. Only flips between `Running` and `Paused`.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            BreakoutPhase::Running => self.phase = BreakoutPhase::Paused,
            BreakoutPhase::Paused => self.phase = BreakoutPhase::Running,
            _ => return false,
        }
        true
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self.phase,
            BreakoutPhase::Paused | BreakoutPhase::LevelTransition { .. }
        )
    }

    pub fn is_over(&self) -> bool {
        self.phase == BreakoutPhase::GameOver
    }

    /// Centre the paddle on a pointer x (canvas-relative)
    ///
    /// Positions outside the open interval `(0, canvas_width)` are ignored.
    pub fn move_paddle_to(&mut self, x: f32) -> bool {
        if self.is_over() || x <= 0.0 || x >= self.config.canvas_width {
            return false;
        }
        self.paddle_x = clamp_paddle(
            x - self.config.paddle_width / 2.0,
            self.config.paddle_width,
            self.config.canvas_width,
        );
        true
    }

    pub fn paddle_rect(&self) -> Rect {
        let c = &self.config;
        Rect::new(
            self.paddle_x,
            c.canvas_height - c.paddle_height - c.paddle_margin,
            c.paddle_width,
            c.paddle_height,
        )
    }

    pub fn brick_rect(&self, column: usize, row: usize) -> Rect {
        brick_rect(&self.config, column, row)
    }

    pub fn bricks_alive(&self) -> usize {
        self.bricks.iter().flatten().filter(|b| b.alive).count()
    }

    /// Points for one brick at the current level
    pub fn brick_points(&self) -> u64 {
        self.config.points_per_brick * self.level as u64
    }

    /// Fresh launch from above the paddle at a random angle in [-45°, 45°]
    fn reset_ball(&mut self, rng: &mut dyn RandomSource) {
        let c = &self.config;
        let angle = ((rng.next_f64() - 0.5) * std::f64::consts::PI / 2.0) as f32;
        let speed = c.ball_speed + c.ball_speed_per_level * self.level as f32;
        self.ball.pos = Vec2::new(c.canvas_width / 2.0, c.canvas_height - 40.0);
        self.ball.vel = launch_velocity(angle, speed);
    }

    fn next_level(&mut self, now_ms: f64, rng: &mut dyn RandomSource) {
        self.level += 1;
        self.bricks = build_bricks(&self.config);
        self.reset_ball(rng);
        self.phase = BreakoutPhase::LevelTransition {
            resume_at_ms: now_ms + self.config.level_pause_ms as f64,
        };
    }
}

fn brick_rect(config: &BreakoutConfig, column: usize, row: usize) -> Rect {
    Rect::new(
        column as f32 * (config.brick_width + config.brick_padding) + config.brick_offset_left,
        row as f32 * (config.brick_height + config.brick_padding) + config.brick_offset_top,
        config.brick_width,
        config.brick_height,
    )
}

fn build_bricks(config: &BreakoutConfig) -> Vec<Vec<Brick>> {
    (0..config.brick_columns)
        .map(|c| {
            (0..config.brick_rows)
                .map(|r| {
                    let rect = brick_rect(config, c, r);
                    Brick {
                        x: rect.x,
                        y: rect.y,
                        alive: true,
                    }
                })
                .collect()
        })
        .collect()
}

/// Advance the game by one fixed tick
pub fn tick(
    state: &mut BreakoutState,
    input: &BreakoutInput,
    now_ms: f64,
    rng: &mut dyn RandomSource,
) -> Vec<BreakoutEvent> {
    let mut events = Vec::new();

    match state.phase {
        BreakoutPhase::Running => {}
        BreakoutPhase::LevelTransition { resume_at_ms } if now_ms >= resume_at_ms => {
            state.phase = BreakoutPhase::Running;
        }
        _ => return events,
    }

    let c = state.config.clone();

    // Paddle
    if input.left {
        state.paddle_x -= c.paddle_speed;
    }
    if input.right {
        state.paddle_x += c.paddle_speed;
    }
    state.paddle_x = clamp_paddle(state.paddle_x, c.paddle_width, c.canvas_width);

    // Ball
    let ball = &mut state.ball;
    ball.pos += ball.vel;

    ball.vel = wall_contact(ball.pos, ball.radius, c.canvas_width).reflect(ball.vel);

    let paddle = state.paddle_rect();
    let ball = &mut state.ball;
    if paddle_contact(ball.pos, ball.radius, paddle, c.canvas_height) {
        ball.vel = deflect(ball.pos.x, paddle, ball.vel);
    }

    if out_of_bounds(ball.pos, ball.radius, c.canvas_height) {
        state.lives = state.lives.saturating_sub(1);
        events.push(BreakoutEvent::LifeLost {
            remaining: state.lives,
        });

        if state.lives == 0 {
            state.phase = BreakoutPhase::GameOver;
            events.push(BreakoutEvent::GameOver {
                score: state.score,
                level: state.level,
            });
            log::info!("Breakout over: score {} level {}", state.score, state.level);
            return events;
        }
        state.reset_ball(rng);
    }

    // Bricks: every alive brick containing the centre is hit this tick
    let points = state.brick_points();
    for (column, bricks) in state.bricks.iter_mut().enumerate() {
        for (row, brick) in bricks.iter_mut().enumerate() {
            if !brick.alive {
                continue;
            }
            let rect = Rect::new(brick.x, brick.y, c.brick_width, c.brick_height);
            if rect.contains_strict(state.ball.pos) {
                state.ball.vel.y = -state.ball.vel.y;
                brick.alive = false;
                state.score += points;
                events.push(BreakoutEvent::BrickDestroyed {
                    column,
                    row,
                    points,
                });
            }
        }
    }

    if state.bricks_alive() == 0 {
        state.next_level(now_ms, rng);
        events.push(BreakoutEvent::LevelCleared {
            next_level: state.level,
        });
        log::debug!("Breakout level {} reached", state.level);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgSource, ScriptedSource};
    use proptest::prelude::*;

    fn running() -> (BreakoutState, ScriptedSource) {
        let mut rng = ScriptedSource::constant(0.5);
        let mut state = BreakoutState::new(BreakoutConfig::default());
        state.start(&mut rng);
        (state, rng)
    }

    /// Place the ball so that after one move its centre is at `target`
    fn aim_at(state: &mut BreakoutState, target: Vec2) {
        state.ball.vel = Vec2::new(0.0, -1.0);
        state.ball.pos = target - state.ball.vel;
    }

    #[test]
    fn test_start_launches_straight_up_at_mid_draw() {
        let (state, _) = running();
        assert_eq!(state.phase, BreakoutPhase::Running);
        assert_eq!(state.ball.pos, Vec2::new(200.0, 260.0));
        // angle 0, speed 4 + 0.5 * 1
        assert!(state.ball.vel.x.abs() < 1e-6);
        assert!((state.ball.vel.y + 4.5).abs() < 1e-6);
        assert_eq!(state.paddle_x, 165.0);
        assert_eq!(state.bricks.len(), 8);
        assert_eq!(state.bricks[0].len(), 5);
    }

    #[test]
    fn test_ready_and_paused_do_not_move() {
        let mut rng = ScriptedSource::constant(0.5);
        let mut state = BreakoutState::new(BreakoutConfig::default());
        let before = state.ball;
        assert!(tick(&mut state, &BreakoutInput::default(), 0.0, &mut rng).is_empty());
        assert_eq!(state.ball, before);

        state.start(&mut rng);
        assert!(state.toggle_pause());
        let before = state.ball;
        tick(&mut state, &BreakoutInput { left: true, right: false }, 16.0, &mut rng);
        assert_eq!(state.ball, before);
        assert_eq!(state.paddle_x, 165.0);

        assert!(state.toggle_pause());
        assert_eq!(state.phase, BreakoutPhase::Running);
    }

    #[test]
    fn test_held_direction_moves_and_clamps_paddle() {
        let (mut state, mut rng) = running();
        let left = BreakoutInput { left: true, right: false };
        tick(&mut state, &left, 16.0, &mut rng);
        assert_eq!(state.paddle_x, 157.0);

        for _ in 0..40 {
            state.ball.pos = Vec2::new(200.0, 150.0);
            tick(&mut state, &left, 16.0, &mut rng);
        }
        assert_eq!(state.paddle_x, 0.0);
    }

    #[test]
    fn test_pointer_outside_canvas_is_ignored() {
        let (mut state, _) = running();
        assert!(!state.move_paddle_to(0.0));
        assert!(!state.move_paddle_to(400.0));
        assert!(state.move_paddle_to(10.0));
        assert_eq!(state.paddle_x, 0.0);
        assert!(state.move_paddle_to(200.0));
        assert_eq!(state.paddle_x, 165.0);
        assert!(state.move_paddle_to(399.0));
        assert_eq!(state.paddle_x, 330.0);
    }

    #[test]
    fn test_brick_hit_scores_and_flips() {
        let (mut state, mut rng) = running();
        let target = state.brick_rect(2, 3);
        aim_at(&mut state, Vec2::new(target.x + 10.0, target.y + 5.0));

        let events = tick(&mut state, &BreakoutInput::default(), 16.0, &mut rng);
        assert_eq!(
            events,
            vec![BreakoutEvent::BrickDestroyed { column: 2, row: 3, points: 10 }]
        );
        assert!(!state.bricks[2][3].alive);
        assert_eq!(state.score, 10);
        assert_eq!(state.ball.vel.y, 1.0);
    }

    #[test]
    fn test_dead_brick_is_not_hit_again() {
        let (mut state, mut rng) = running();
        state.bricks[0][0].alive = false;
        let target = state.brick_rect(0, 0);
        aim_at(&mut state, Vec2::new(target.x + 10.0, target.y + 5.0));

        let events = tick(&mut state, &BreakoutInput::default(), 16.0, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
        assert!(!state.bricks[0][0].alive);
    }

    #[test]
    fn test_paddle_hit_before_floor() {
        let (mut state, mut rng) = running();
        // Paddle spans 165..235, top at 285
        state.ball.pos = Vec2::new(200.0, 276.0);
        state.ball.vel = Vec2::new(0.0, 4.0);
        let events = tick(&mut state, &BreakoutInput::default(), 16.0, &mut rng);
        assert!(events.is_empty());
        assert!(state.ball.vel.y < 0.0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_losing_a_life_relaunches() {
        let (mut state, mut rng) = running();
        state.paddle_x = 0.0;
        state.ball.pos = Vec2::new(300.0, 292.0);
        state.ball.vel = Vec2::new(0.0, 4.0);

        let events = tick(&mut state, &BreakoutInput::default(), 16.0, &mut rng);
        assert_eq!(events, vec![BreakoutEvent::LifeLost { remaining: 2 }]);
        assert_eq!(state.lives, 2);
        assert_eq!(state.ball.pos, Vec2::new(200.0, 260.0));
        assert_eq!(state.phase, BreakoutPhase::Running);
    }

    #[test]
    fn test_last_life_is_terminal() {
        let (mut state, mut rng) = running();
        state.lives = 1;
        state.score = 70;
        state.paddle_x = 0.0;
        state.ball.pos = Vec2::new(300.0, 292.0);
        state.ball.vel = Vec2::new(0.0, 4.0);

        let events = tick(&mut state, &BreakoutInput::default(), 16.0, &mut rng);
        assert_eq!(
            events,
            vec![
                BreakoutEvent::LifeLost { remaining: 0 },
                BreakoutEvent::GameOver { score: 70, level: 1 },
            ]
        );
        assert!(state.is_over());

        let snapshot = state.clone();
        for _ in 0..10 {
            assert!(tick(&mut state, &BreakoutInput { left: true, right: false }, 32.0, &mut rng).is_empty());
        }
        assert_eq!(state.ball, snapshot.ball);
        assert_eq!(state.paddle_x, snapshot.paddle_x);
        assert_eq!(state.lives, 0);
        assert!(!state.toggle_pause());
        assert!(!state.move_paddle_to(100.0));
    }

    #[test]
    fn test_clearing_all_bricks_advances_level() {
        let (mut state, mut rng) = running();
        let mut now = 0.0;

        for column in 0..8 {
            for row in 0..5 {
                let rect = state.brick_rect(column, row);
                aim_at(&mut state, Vec2::new(rect.x + 20.0, rect.y + 7.0));
                now += 16.0;
                tick(&mut state, &BreakoutInput::default(), now, &mut rng);
            }
        }

        assert_eq!(state.score, 400);
        assert_eq!(state.level, 2);
        assert_eq!(state.bricks_alive(), 40);
        assert_eq!(state.ball.pos, Vec2::new(200.0, 260.0));
        // speed 4 + 0.5 * 2
        assert!((state.ball.vel.length() - 5.0).abs() < 1e-5);
        assert_eq!(
            state.phase,
            BreakoutPhase::LevelTransition { resume_at_ms: now + 1000.0 }
        );

        // Frozen during the transition, pause toggle ignored
        assert!(!state.toggle_pause());
        let frozen = state.ball;
        tick(&mut state, &BreakoutInput::default(), now + 500.0, &mut rng);
        assert_eq!(state.ball, frozen);

        tick(&mut state, &BreakoutInput::default(), now + 1000.0, &mut rng);
        assert_eq!(state.phase, BreakoutPhase::Running);
        assert_ne!(state.ball.pos, frozen.pos);
        assert_eq!(state.brick_points(), 20);
    }

    proptest! {
        #[test]
        fn prop_paddle_always_clamped(
            seed in any::<u64>(),
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>(), proptest::option::of(-50.0f32..450.0)), 1..200),
        ) {
            let mut rng = PcgSource::seeded(seed);
            let mut state = BreakoutState::new(BreakoutConfig::default());
            state.start(&mut rng);
            let max = state.config.canvas_width - state.config.paddle_width;

            for (i, (left, right, pointer)) in inputs.into_iter().enumerate() {
                if let Some(x) = pointer {
                    state.move_paddle_to(x);
                }
                tick(&mut state, &BreakoutInput { left, right }, i as f64 * 16.0, &mut rng);
                prop_assert!(state.paddle_x >= 0.0 && state.paddle_x <= max);
            }
        }

        #[test]
        fn prop_score_lives_and_bricks_monotonic(seed in any::<u64>(), ticks in 1usize..2000) {
            let mut rng = PcgSource::seeded(seed);
            let mut state = BreakoutState::new(BreakoutConfig::default());
            state.start(&mut rng);

            for i in 0..ticks {
                let level = state.level;
                let score = state.score;
                let lives = state.lives;
                let alive: Vec<Vec<bool>> = state
                    .bricks
                    .iter()
                    .map(|col| col.iter().map(|b| b.alive).collect())
                    .collect();
                let over = state.is_over();

                let events = tick(&mut state, &BreakoutInput::default(), i as f64 * 16.0, &mut rng);

                prop_assert!(state.lives <= lives);
                if over {
                    prop_assert!(events.is_empty());
                }
                if state.level == level {
                    let destroyed = events
                        .iter()
                        .filter(|e| matches!(e, BreakoutEvent::BrickDestroyed { .. }))
                        .count() as u64;
                    prop_assert_eq!(state.score, score + destroyed * 10 * level as u64);
                    for (c, col) in state.bricks.iter().enumerate() {
                        for (r, brick) in col.iter().enumerate() {
                            if !alive[c][r] {
                                prop_assert!(!brick.alive);
                            }
                        }
                    }
                }
            }
        }
    }
}
