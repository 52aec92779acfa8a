//! Core engine types: ids, RNG, configuration, errors.
//!
//! These are the building blocks every other module shares. Nothing in here
//! knows about the rules of the game beyond the constants in `GameConfig`.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{BlockId, ItemId};
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState, DIE_FACES};
pub use config::{GameConfig, DEFAULT_ESTATE_LEVELS};
pub use error::{GameError, Result};
