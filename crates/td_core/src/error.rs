//! Error types for the game simulation.
//!
//! Per-frame gameplay never uses these for control flow: failed
//! purchases and placements are `bool`/`Option` returns that leave
//! state untouched. Errors cover content problems and host misuse.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A wave or spawn request named an enemy kind the core does not know.
    #[error("Unknown enemy kind: {0}")]
    UnknownEnemyKind(String),

    /// A purchase request named a tower kind the core does not know.
    #[error("Unknown tower kind: {0}")]
    UnknownTowerKind(String),

    /// Requested level id is not in the catalogue.
    #[error("Level not found: {0}")]
    LevelNotFound(u32),

    /// Invalid game state for the requested operation.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
