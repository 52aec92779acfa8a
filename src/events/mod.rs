//! Event system.
//!
//! Entities never hold references to each other. A place that wants a
//! player to pay publishes `AddMoney`; a player that wants to buy publishes
//! `BuyPlace`; a project that cares about upgrades subscribes to
//! `EstateUpgraded` while it is owned. The bus delivers synchronously and
//! reentrantly, so a chain like "upgrade -> builder payout -> debt recovery"
//! completes inside the publish that started it.
//!
//! ## Components
//!
//! - [`EventBus`]: handler table keyed by kind, with [`publish`] and the
//!   [`check_any_true`] voting combinator
//! - [`GameEvent`] / [`EventKind`]: the engine's event catalogue

pub mod bus;
pub mod event;

pub use bus::{check_any_true, publish, Dispatch, Event, EventBus, EventHost, Handler, SubscriptionId};
pub use event::{EventKind, GameEvent};
