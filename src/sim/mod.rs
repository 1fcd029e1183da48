//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as an explicit `now_ms` argument
//! - Randomness only through a passed-in `RandomSource`
//! - Stable iteration order (columns, then rows; reels left to right)
//! - No rendering, storage or platform dependencies

pub mod breakout;
pub mod collision;
pub mod particles;
pub mod slots;
pub mod snake;

pub use breakout::{BreakoutEvent, BreakoutInput, BreakoutPhase, BreakoutState};
pub use collision::Rect;
pub use particles::Particle;
pub use slots::{Payout, SlotEvent, SlotState, SpinRejection, WinHighlight, WinKind, evaluate};
pub use snake::{Cell, DeathCause, Direction, SnakeEvent, SnakePhase, SnakeState};
