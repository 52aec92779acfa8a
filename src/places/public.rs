//! Public squares: unowned squares with a fixed effect.
//!
//! The prison is the only stateful one. It records the remaining stay of
//! every inmate and, while it has inmates, subscribes to:
//! - `TurnStarted`: count the inmate's stay down, release at zero
//! - `BlockTurn`: vote to block an inmate's turn
//! - `BlockMoney`: vote to block an inmate's money changes
//! - `PlayerEliminated`: forget an eliminated inmate
//!
//! The subscriptions are dropped as soon as the last inmate is released.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{Event, EventKind, GameEvent};

use super::ListenerGuard;

/// Remaining prison stay per inmate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrisonRecord {
    inmates: BTreeMap<PlayerId, u32>,
}

impl PrisonRecord {
    /// Empty prison.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inmates.is_empty()
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.inmates.contains_key(&player)
    }

    /// Remaining stay of `player`, if imprisoned.
    #[must_use]
    pub fn remaining(&self, player: PlayerId) -> Option<u32> {
        self.inmates.get(&player).copied()
    }

    /// Inmates in id order.
    pub fn inmates(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.inmates.keys().copied()
    }

    /// Lock `player` up for `stay` turns.
    pub fn admit(&mut self, player: PlayerId, stay: u32) {
        let previous = self.inmates.insert(player, stay);
        assert!(previous.is_none(), "{} is already in prison", player);
    }

    /// One turn of `player` passed. Returns true if they were released.
    pub fn count_down(&mut self, player: PlayerId) -> bool {
        match self.inmates.get_mut(&player) {
            Some(0) => {
                self.inmates.remove(&player);
                true
            }
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        }
    }

    /// Forget `player`. Returns true if they were an inmate.
    pub fn release(&mut self, player: PlayerId) -> bool {
        self.inmates.remove(&player).is_some()
    }
}

/// Public square kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicKind {
    /// Passing pays the start bonus; landing offers an upgrade.
    Start,
    News,
    Luck,
    Prison(PrisonRecord),
    /// Pays `unit + unit * projects owned`.
    Stock,
    /// Sends the visitor to the prison at `prison`.
    GotoPrison { prison: usize },
    /// Pays the park reward.
    Park,
    /// Charges a fixed amount per estate owned.
    Tax,
}

/// An unowned square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSquare {
    name: String,
    kind: PublicKind,
}

impl PublicSquare {
    pub fn new(name: impl Into<String>, kind: PublicKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn start(name: impl Into<String>) -> Self {
        Self::new(name, PublicKind::Start)
    }

    pub fn prison(name: impl Into<String>) -> Self {
        Self::new(name, PublicKind::Prison(PrisonRecord::new()))
    }

    pub fn goto_prison(name: impl Into<String>, prison: usize) -> Self {
        Self::new(name, PublicKind::GotoPrison { prison })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &PublicKind {
        &self.kind
    }

    /// The prison record, if this square is a prison.
    #[must_use]
    pub fn prison_record(&self) -> Option<&PrisonRecord> {
        match &self.kind {
            PublicKind::Prison(record) => Some(record),
            _ => None,
        }
    }

    pub(crate) fn prison_record_mut(&mut self) -> Option<&mut PrisonRecord> {
        match &mut self.kind {
            PublicKind::Prison(record) => Some(record),
            _ => None,
        }
    }

    pub(crate) fn clear(&mut self) {
        if let Some(record) = self.prison_record_mut() {
            *record = PrisonRecord::new();
        }
    }
}

/// Permanent subscriptions of the square at `id`.
pub(crate) fn attach(board: &mut Board, id: ItemId) {
    if matches!(board.public(id).kind(), PublicKind::Start) {
        board.subscribe(EventKind::PassedStart, move |board, event| {
            if let GameEvent::PassedStart { player } = *event {
                let bonus = board.config().start_bonus;
                info!(player = board.player(player).name(), bonus, square = %id, "passed start");
                board.publish(GameEvent::AddMoney { player, delta: bonus });
            }
            false
        });
    }
}

/// `player` landed on the square at `id`.
pub(crate) fn trigger(board: &mut Board, id: ItemId, player: PlayerId) {
    let name = board.player(player).name().to_owned();
    let kind = board.public(id).kind().clone();
    match kind {
        PublicKind::Start => {
            board.publish(GameEvent::UpgradeAnyDecision { player });
        }
        PublicKind::News | PublicKind::Luck => {
            info!(player = %name, square = board.public(id).name(), "draws a card");
            board.publish(GameEvent::NewsOrLuckDrawn { square: id, player });
        }
        PublicKind::Prison(_) => {
            let stay = board.config().prison_stay;
            if let Some(record) = board.public_mut(id).prison_record_mut() {
                record.admit(player, stay);
            }
            info!(player = %name, stay, "goes to prison");
            super::sync_listener(board, id);
        }
        PublicKind::GotoPrison { prison } => {
            info!(player = %name, position = prison, "sent to prison");
            board.publish(GameEvent::MoveTo { player, position: prison, delay: 0 });
        }
        PublicKind::Stock => {
            let unit = board.config().stock_unit;
            let projects = board.player(player).projects().len() as i64;
            let delta = unit + unit * projects;
            info!(player = %name, delta, "stock dividend");
            board.publish(GameEvent::AddMoney { player, delta });
        }
        PublicKind::Park => {
            let delta = board.config().park_reward;
            info!(player = %name, delta, "park reward");
            board.publish(GameEvent::AddMoney { player, delta });
        }
        PublicKind::Tax => {
            let estates = board.player(player).estates().len() as i64;
            let delta = -board.config().tax_per_estate * estates;
            info!(player = %name, delta, "pays tax");
            board.publish(GameEvent::AddMoney { player, delta });
        }
    }
}

/// Subscriptions a prison holds while it has inmates.
pub(crate) fn listen(board: &mut Board, id: ItemId) -> ListenerGuard {
    let mut guard = ListenerGuard::default();

    let sub = board.subscribe(EventKind::TurnStarted, move |board, event| {
        if let GameEvent::TurnStarted { player } = *event {
            let released = board
                .public_mut(id)
                .prison_record_mut()
                .is_some_and(|record| record.count_down(player));
            if released {
                info!(player = board.player(player).name(), "released from prison");
                super::sync_listener(board, id);
            }
        }
        false
    });
    guard.push(EventKind::TurnStarted, sub);

    for kind in [EventKind::BlockTurn, EventKind::BlockMoney] {
        let sub = board.subscribe(kind, move |board, event| {
            let blocked = event
                .player()
                .zip(board.public(id).prison_record())
                .is_some_and(|(player, record)| record.contains(player));
            if blocked {
                debug!(event = ?event.kind(), "blocked by prison");
            }
            blocked
        });
        guard.push(kind, sub);
    }

    let sub = board.subscribe(EventKind::PlayerEliminated, move |board, event| {
        if let GameEvent::PlayerEliminated { player } = *event {
            let released = board
                .public_mut(id)
                .prison_record_mut()
                .is_some_and(|record| record.release(player));
            if released {
                super::sync_listener(board, id);
            }
        }
        false
    });
    guard.push(EventKind::PlayerEliminated, sub);

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prison_countdown() {
        let mut record = PrisonRecord::new();
        let p = PlayerId::new(1);
        record.admit(p, 1);
        assert!(record.contains(p));
        assert_eq!(record.remaining(p), Some(1));

        assert!(!record.count_down(p));
        assert_eq!(record.remaining(p), Some(0));
        assert!(record.count_down(p));
        assert!(record.is_empty());

        // Not an inmate
        assert!(!record.count_down(p));
    }

    #[test]
    #[should_panic(expected = "already in prison")]
    fn test_double_admit() {
        let mut record = PrisonRecord::new();
        record.admit(PlayerId::new(0), 1);
        record.admit(PlayerId::new(0), 1);
    }

    #[test]
    fn test_release() {
        let mut record = PrisonRecord::new();
        record.admit(PlayerId::new(0), 3);
        record.admit(PlayerId::new(2), 3);
        assert!(record.release(PlayerId::new(0)));
        assert!(!record.release(PlayerId::new(0)));
        assert_eq!(record.inmates().collect::<Vec<_>>(), vec![PlayerId::new(2)]);
    }

    #[test]
    fn test_square_constructors() {
        let prison = PublicSquare::prison("Prison");
        assert!(prison.prison_record().is_some_and(PrisonRecord::is_empty));

        let goto = PublicSquare::goto_prison("Go to prison", 5);
        assert_eq!(goto.kind(), &PublicKind::GotoPrison { prison: 5 });
        assert!(goto.prison_record().is_none());
        assert_eq!(PublicSquare::start("Start").name(), "Start");
    }
}
