//! Game event catalogue.
//!
//! Every event name the engine publishes is a `GameEvent` variant with its own
//! typed payload; `EventKind` is the payload-free tag handlers subscribe to.
//!
//! Events fall into four groups:
//! - **Commands to players**: a place asks a player to pay, move or decide.
//! - **Commands to places**: a player asks a place to change hands or level.
//! - **Notifications**: an entity reports a change of its own state.
//! - **Queries**: handlers vote `true` to block something (see
//!   [`check_any_true`](super::check_any_true)).

use serde::{Deserialize, Serialize};

use crate::core::{ItemId, PlayerId};

use super::bus::Event;

/// Payload-free event tag. Subscriptions are keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // Commands to players
    AddMoney,
    MoveTo,
    BuyDecision,
    UpgradeDecision,
    JumpDecision,
    UpgradeAnyDecision,

    // Commands to places
    BuyPlace,
    SellPlace,
    UpgradeEstate,
    DegradeEstate,
    PledgeEstate,
    RebuyEstate,

    // Place notifications
    PlaceBought,
    PlaceSold,
    EstateUpgraded,
    EstateDegraded,
    EstatePledged,
    EstateRebought,
    NewsOrLuckDrawn,

    // Player notifications and queries
    TurnStarted,
    BlockTurn,
    BlockMoney,
    DiceRolled,
    PassedStart,
    TurnFinished,
    MoneyChanged,
    PlayerBankrupt,

    // Board notifications
    RoundStarted,
    RoundFinished,
    PlayerEliminated,
    GameFinished,
    RenderTable,
    RollbackRequested,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A game event with its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Change a player's money by `delta` (negative = pay).
    AddMoney { player: PlayerId, delta: i64 },
    /// Move a player to `position`, `delay` turns from now (0 = immediately).
    MoveTo { player: PlayerId, position: usize, delay: u32 },
    /// The player may buy `place`.
    BuyDecision { player: PlayerId, place: ItemId },
    /// The player may upgrade their own `estate`.
    UpgradeDecision { player: PlayerId, estate: ItemId },
    /// The player may queue a jump to one of their estates.
    /// Handlers return `true` when a jump was queued.
    JumpDecision { player: PlayerId, delay: u32 },
    /// The player may upgrade any one of their estates.
    UpgradeAnyDecision { player: PlayerId },

    /// `buyer` buys `place`.
    BuyPlace { place: ItemId, buyer: PlayerId },
    /// The owner sells `place` back to the bank.
    SellPlace { place: ItemId },
    /// The owner upgrades `estate` by one level.
    UpgradeEstate { estate: ItemId },
    /// `estate` loses one level.
    DegradeEstate { estate: ItemId },
    /// The owner pledges `estate` to the bank.
    PledgeEstate { estate: ItemId },
    /// The owner buys a pledged `estate` back.
    RebuyEstate { estate: ItemId },

    /// `place` now belongs to `owner`.
    PlaceBought { place: ItemId, owner: PlayerId, price: i64 },
    /// `place` was sold by `former_owner` for `value`.
    PlaceSold { place: ItemId, former_owner: PlayerId, value: i64 },
    /// `estate` reached `level`.
    EstateUpgraded { estate: ItemId, owner: PlayerId, level: usize },
    /// `estate` dropped to `level`.
    EstateDegraded { estate: ItemId, owner: PlayerId, level: usize },
    /// `estate` was pledged.
    EstatePledged { estate: ItemId, owner: PlayerId },
    /// `estate` was bought back.
    EstateRebought { estate: ItemId, owner: PlayerId },
    /// A news or luck square was triggered by `player`.
    NewsOrLuckDrawn { square: ItemId, player: PlayerId },

    /// `player` begins a turn.
    TurnStarted { player: PlayerId },
    /// Query: is `player`'s turn blocked?
    BlockTurn { player: PlayerId },
    /// Query: is a money change of `delta` for `player` blocked?
    BlockMoney { player: PlayerId, delta: i64 },
    /// `player` rolled `value`.
    DiceRolled { player: PlayerId, value: u32 },
    /// `player` crossed the start line (one event per lap).
    PassedStart { player: PlayerId },
    /// `player` ended a turn.
    TurnFinished { player: PlayerId },
    /// `player`'s balance changed.
    MoneyChanged { player: PlayerId, delta: i64, balance: i64 },
    /// `player` could not recover from debt.
    PlayerBankrupt { player: PlayerId },

    /// Round `round` begins.
    RoundStarted { round: u32 },
    /// Round `round` is over.
    RoundFinished { round: u32 },
    /// `player` left the game.
    PlayerEliminated { player: PlayerId },
    /// The game ended; `winner` is `None` for a draw.
    GameFinished { winner: Option<PlayerId>, rounds: u32 },
    /// Display sink: render a table.
    RenderTable { title: String, header: Vec<String>, rows: Vec<Vec<String>> },
    /// Ask the game loop to rewind `rounds` rounds.
    RollbackRequested { rounds: u32 },
}

impl GameEvent {
    /// The player this event is addressed to or about, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::AddMoney { player, .. }
            | GameEvent::MoveTo { player, .. }
            | GameEvent::BuyDecision { player, .. }
            | GameEvent::UpgradeDecision { player, .. }
            | GameEvent::JumpDecision { player, .. }
            | GameEvent::UpgradeAnyDecision { player }
            | GameEvent::NewsOrLuckDrawn { player, .. }
            | GameEvent::TurnStarted { player }
            | GameEvent::BlockTurn { player }
            | GameEvent::BlockMoney { player, .. }
            | GameEvent::DiceRolled { player, .. }
            | GameEvent::PassedStart { player }
            | GameEvent::TurnFinished { player }
            | GameEvent::MoneyChanged { player, .. }
            | GameEvent::PlayerBankrupt { player }
            | GameEvent::PlayerEliminated { player } => Some(*player),
            GameEvent::BuyPlace { buyer, .. } => Some(*buyer),
            GameEvent::PlaceBought { owner, .. }
            | GameEvent::EstateUpgraded { owner, .. }
            | GameEvent::EstateDegraded { owner, .. }
            | GameEvent::EstatePledged { owner, .. }
            | GameEvent::EstateRebought { owner, .. } => Some(*owner),
            GameEvent::PlaceSold { former_owner, .. } => Some(*former_owner),
            _ => None,
        }
    }

    /// The board item this event is addressed to or about, if any.
    #[must_use]
    pub fn item(&self) -> Option<ItemId> {
        match self {
            GameEvent::BuyDecision { place, .. }
            | GameEvent::BuyPlace { place, .. }
            | GameEvent::SellPlace { place }
            | GameEvent::PlaceBought { place, .. }
            | GameEvent::PlaceSold { place, .. } => Some(*place),
            GameEvent::UpgradeDecision { estate, .. }
            | GameEvent::UpgradeEstate { estate }
            | GameEvent::DegradeEstate { estate }
            | GameEvent::PledgeEstate { estate }
            | GameEvent::RebuyEstate { estate }
            | GameEvent::EstateUpgraded { estate, .. }
            | GameEvent::EstateDegraded { estate, .. }
            | GameEvent::EstatePledged { estate, .. }
            | GameEvent::EstateRebought { estate, .. } => Some(*estate),
            GameEvent::NewsOrLuckDrawn { square, .. } => Some(*square),
            _ => None,
        }
    }
}

impl Event for GameEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            GameEvent::AddMoney { .. } => EventKind::AddMoney,
            GameEvent::MoveTo { .. } => EventKind::MoveTo,
            GameEvent::BuyDecision { .. } => EventKind::BuyDecision,
            GameEvent::UpgradeDecision { .. } => EventKind::UpgradeDecision,
            GameEvent::JumpDecision { .. } => EventKind::JumpDecision,
            GameEvent::UpgradeAnyDecision { .. } => EventKind::UpgradeAnyDecision,
            GameEvent::BuyPlace { .. } => EventKind::BuyPlace,
            GameEvent::SellPlace { .. } => EventKind::SellPlace,
            GameEvent::UpgradeEstate { .. } => EventKind::UpgradeEstate,
            GameEvent::DegradeEstate { .. } => EventKind::DegradeEstate,
            GameEvent::PledgeEstate { .. } => EventKind::PledgeEstate,
            GameEvent::RebuyEstate { .. } => EventKind::RebuyEstate,
            GameEvent::PlaceBought { .. } => EventKind::PlaceBought,
            GameEvent::PlaceSold { .. } => EventKind::PlaceSold,
            GameEvent::EstateUpgraded { .. } => EventKind::EstateUpgraded,
            GameEvent::EstateDegraded { .. } => EventKind::EstateDegraded,
            GameEvent::EstatePledged { .. } => EventKind::EstatePledged,
            GameEvent::EstateRebought { .. } => EventKind::EstateRebought,
            GameEvent::NewsOrLuckDrawn { .. } => EventKind::NewsOrLuckDrawn,
            GameEvent::TurnStarted { .. } => EventKind::TurnStarted,
            GameEvent::BlockTurn { .. } => EventKind::BlockTurn,
            GameEvent::BlockMoney { .. } => EventKind::BlockMoney,
            GameEvent::DiceRolled { .. } => EventKind::DiceRolled,
            GameEvent::PassedStart { .. } => EventKind::PassedStart,
            GameEvent::TurnFinished { .. } => EventKind::TurnFinished,
            GameEvent::MoneyChanged { .. } => EventKind::MoneyChanged,
            GameEvent::PlayerBankrupt { .. } => EventKind::PlayerBankrupt,
            GameEvent::RoundStarted { .. } => EventKind::RoundStarted,
            GameEvent::RoundFinished { .. } => EventKind::RoundFinished,
            GameEvent::PlayerEliminated { .. } => EventKind::PlayerEliminated,
            GameEvent::GameFinished { .. } => EventKind::GameFinished,
            GameEvent::RenderTable { .. } => EventKind::RenderTable,
            GameEvent::RollbackRequested { .. } => EventKind::RollbackRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let event = GameEvent::AddMoney { player: PlayerId::new(0), delta: 10 };
        assert_eq!(event.kind(), EventKind::AddMoney);

        let event = GameEvent::EstateUpgraded {
            estate: ItemId::new(3),
            owner: PlayerId::new(1),
            level: 2,
        };
        assert_eq!(event.kind(), EventKind::EstateUpgraded);
        assert_eq!(format!("{}", event.kind()), "EstateUpgraded");
    }

    #[test]
    fn test_player_accessor() {
        let event = GameEvent::BuyPlace { place: ItemId::new(2), buyer: PlayerId::new(1) };
        assert_eq!(event.player(), Some(PlayerId::new(1)));
        assert_eq!(event.item(), Some(ItemId::new(2)));

        let event = GameEvent::RoundStarted { round: 1 };
        assert_eq!(event.player(), None);
        assert_eq!(event.item(), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::PlaceSold {
            place: ItemId::new(4),
            former_owner: PlayerId::new(0),
            value: 1200,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
