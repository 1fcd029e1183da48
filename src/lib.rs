//! Terminal Arcade - canvas mini-games for a browser terminal shell
//!
//! Core modules:
//! - `sim`: Deterministic simulations (breakout, snake, slot reels)
//! - `games`: Engines wiring a simulation to input, scores and notices
//! - `renderer`: 2D drawing surface and per-game draw functions
//! - `platform`: Input model, sessions and hosts (headless, browser)
//! - `persistence`: Key/value score store (LocalStorage or memory)
//! - `config`: Tunable game constants with JSON overrides
//! - `commands`: Terminal command dispatch

pub mod commands;
pub mod config;
pub mod error;
pub mod games;
pub mod highscores;
pub mod notice;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod rng;
pub mod sim;

pub use commands::Arcade;
pub use config::GamesConfig;
pub use error::{GameError, Result};
pub use games::{Game, GameKind};
pub use notice::{Notice, Tone};
pub use platform::{HeadlessHost, Mount, Session};
