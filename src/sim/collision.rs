//! Collision detection and response for the paddle/ball game
//!
//! All tests are plain overlap checks, evaluated by the caller in a fixed
//! order: walls, paddle, floor, bricks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interior test (edges excluded)
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }
}

/// Which walls a ball touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right edge
    pub side: bool,
    pub top: bool,
}

impl WallContact {
    /// Flip the velocity component of every touched wall
    pub fn reflect(&self, vel: Vec2) -> Vec2 {
        Vec2::new(
            if self.side { -vel.x } else { vel.x },
            if self.top { -vel.y } else { vel.y },
        )
    }
}

pub fn wall_contact(pos: Vec2, radius: f32, width: f32) -> WallContact {
    WallContact {
        side: pos.x + radius > width || pos.x - radius < 0.0,
        top: pos.y - radius < 0.0,
    }
}

/// Ball bottom inside the band between the paddle top and the floor, and
/// ball centre strictly within the paddle's horizontal span
pub fn paddle_contact(pos: Vec2, radius: f32, paddle: Rect, floor: f32) -> bool {
    let bottom = pos.y + radius;
    bottom > paddle.y && bottom < floor && pos.x > paddle.x && pos.x < paddle.right()
}

/// New velocity after a paddle hit
///
/// The impact offset from the paddle centre maps linearly onto
/// [-60°, +60°] from vertical. Speed is preserved and the ball always
/// leaves upward.
pub fn deflect(ball_x: f32, paddle: Rect, vel: Vec2) -> Vec2 {
    let hit = (ball_x - paddle.x) / paddle.w - 0.5;
    let angle = hit * (std::f32::consts::PI / 3.0);
    launch_velocity(angle, vel.length())
}

/// Upward velocity at `angle` radians from vertical
pub fn launch_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.sin() * speed, -(angle.cos() * speed).abs())
}

/// Ball bottom below the floor
pub fn out_of_bounds(pos: Vec2, radius: f32, floor: f32) -> bool {
    pos.y + radius > floor
}

/// Clamp a paddle's left edge to `[0, width - paddle_width]`
pub fn clamp_paddle(x: f32, paddle_width: f32, width: f32) -> f32 {
    x.max(0.0).min((width - paddle_width).max(0.0))
}
