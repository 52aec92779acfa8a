//! # richman
//!
//! A turn-based property-trading board game engine.
//!
//! ## Design Principles
//!
//! 1. **Entities Talk Through Events**: Squares and players never hold
//!    references to each other. They publish commands and notifications on
//!    the board's event bus and react to what they subscribe to.
//!
//! 2. **Value State, Cheap Snapshots**: Squares and players live in
//!    persistent vectors (`im-rs`), so capturing the board after every round
//!    is O(1) and a rollback is a plain restore.
//!
//! 3. **Deterministic Dice**: A seeded ChaCha8 die; deep snapshots rewind
//!    it together with the board.
//!
//! ## Modules
//!
//! - `core`: ids, dice, configuration, errors
//! - `events`: the event bus and the event catalogue
//! - `places`: estates and blocks, projects, public squares
//! - `players`: player state, strategies, turns and the money funnel
//! - `board`: the board, the round loop, snapshots and map files
//! - `transaction`: bounded snapshot history
//! - `game`: the game loop with commit and rollback
//! - `maps`: built-in boards

pub mod board;
pub mod core;
pub mod events;
pub mod game;
pub mod maps;
pub mod places;
pub mod players;
pub mod transaction;

pub use crate::core::{BlockId, GameConfig, GameError, GameRng, GameRngState, ItemId, PlayerId, Result};

pub use crate::events::{check_any_true, Dispatch, EventBus, EventKind, GameEvent, SubscriptionId};

pub use crate::places::{Block, Estate, Item, Project, ProjectKind, PublicKind, PublicSquare};

pub use crate::players::{ConsoleStrategy, Player, PreDice, SimpleStrategy, Strategy};

pub use crate::board::Board;
pub use crate::game::{Game, GameResult};
pub use crate::transaction::{Memento, Transaction};

/// Everything needed to set up and run a game.
pub mod prelude {
    pub use crate::board::Board;
    pub use crate::core::{BlockId, GameConfig, GameError, ItemId, PlayerId, Result};
    pub use crate::events::{EventKind, GameEvent};
    pub use crate::game::{Game, GameResult};
    pub use crate::places::{Estate, Item, Project, ProjectKind, PublicKind, PublicSquare};
    pub use crate::players::{ConsoleStrategy, Player, PreDice, SimpleStrategy, Strategy};
    pub use crate::transaction::{Memento, Transaction};
}
