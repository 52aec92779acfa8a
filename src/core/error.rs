//! Recoverable engine errors.
//!
//! Broken preconditions (buying an owned place, upgrading past the top level,
//! registering a player twice) are caller bugs and panic. Insolvency is a
//! game state, not an error. What is left ends up here: I/O and encoding
//! failures around map files, and the rollback signal that unwinds a round.

use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Not a map file: {path}")]
    NotAMapFile { path: String },

    #[error("Map version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Rollback of {rounds} round(s) requested")]
    RollbackRequested { rounds: u32 },

    #[error("Cannot roll back {requested} step(s), only {available} available")]
    InsufficientHistory { requested: usize, available: usize },
}

impl GameError {
    /// Can the game loop carry on after this error?
    pub fn is_recoverable(&self) -> bool {
        match self {
            GameError::RollbackRequested { .. } => true,
            GameError::InsufficientHistory { .. } => true,
            GameError::Io(_) => false,
            GameError::Encode(_) => false,
            GameError::NotAMapFile { .. } => false,
            GameError::VersionMismatch { .. } => false,
        }
    }
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        assert!(GameError::RollbackRequested { rounds: 1 }.is_recoverable());
        assert!(GameError::InsufficientHistory { requested: 3, available: 1 }.is_recoverable());
        assert!(!GameError::NotAMapFile { path: "x".into() }.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = GameError::VersionMismatch { found: 2, expected: 1 };
        assert_eq!(err.to_string(), "Map version mismatch: found 2, expected 1");

        let err = GameError::InsufficientHistory { requested: 4, available: 2 };
        assert_eq!(err.to_string(), "Cannot roll back 4 step(s), only 2 available");
    }
}
