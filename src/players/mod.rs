//! Players, their decisions and their turns.
//!
//! ## Components
//!
//! - [`Player`]: money, position, owned places, queued moves
//! - [`Strategy`]: the decision hooks, with [`SimpleStrategy`] and
//!   [`ConsoleStrategy`]
//! - `turn`: the turn sequence and movement
//! - `money`: the money funnel and debt recovery
//! - `handlers`: the player's bus subscriptions

pub(crate) mod handlers;
pub(crate) mod money;
pub mod player;
pub mod strategy;
pub(crate) mod turn;

pub use player::{DelayedMove, Player};
pub use strategy::{buy_price, ConsoleStrategy, PreDice, SimpleStrategy, Strategy};
