//! Host-side error type
//!
//! Gameplay never fails: collisions, game over and rejected spins are plain
//! values. `GameError` only covers the host boundary (mounting a surface,
//! reading configuration, resolving a command).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The dispatcher was asked for a game it does not know
    #[error("unknown game `{0}`")]
    UnknownGame(String),

    /// The host could not provide a 2D drawing context
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A DOM node the host needs (output region, document) is missing
    #[error("host element unavailable: {0}")]
    ElementUnavailable(String),

    /// Configuration JSON failed to parse
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
