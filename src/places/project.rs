//! Projects: buyable squares with a kind-specific effect.
//!
//! | Kind | Landing | While owned |
//! |------|---------|-------------|
//! | Nuclear | visitor pays `unit + unit * highest estate level` | |
//! | Builder | visitor may upgrade any estate | owner earns on every `EstateUpgraded` |
//! | Transportation | visitor pays by carriers owned, then may jump | |
//! | TvStation | | owner earns on every `NewsOrLuckDrawn` |
//! | Sewerage | visitor pays `unit + unit * (estates / 3)` | |
//!
//! The "while owned" effects are subscriptions held by a listener that is
//! acquired on purchase and released on sale (see [`super::sync_listener`]).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{check_any_true, EventKind, GameEvent};

use super::ListenerGuard;

/// Project kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    Nuclear,
    Builder,
    Transportation,
    TvStation,
    Sewerage,
}

impl ProjectKind {
    /// Does an owned project of this kind listen to the bus?
    #[must_use]
    pub fn listens_while_owned(self) -> bool {
        matches!(self, ProjectKind::Builder | ProjectKind::TvStation)
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectKind::Nuclear => "nuclear",
            ProjectKind::Builder => "builder",
            ProjectKind::Transportation => "transportation",
            ProjectKind::TvStation => "tv station",
            ProjectKind::Sewerage => "sewerage",
        };
        f.write_str(name)
    }
}

/// A buyable project square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: String,
    kind: ProjectKind,
    buy_value: i64,
    sell_value: i64,
    owner: Option<PlayerId>,
}

impl Project {
    /// Create an unowned project.
    pub fn new(name: impl Into<String>, kind: ProjectKind, buy_value: i64, sell_value: i64) -> Self {
        let name = name.into();
        assert!(buy_value > 0, "Project {} needs a positive price", name);
        assert!(sell_value >= 0, "Project {} has a negative sale value", name);
        Self {
            name,
            kind,
            buy_value,
            sell_value,
            owner: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub fn buy_value(&self) -> i64 {
        self.buy_value
    }

    #[must_use]
    pub fn sell_value(&self) -> i64 {
        self.sell_value
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.owner.is_none()
    }

    /// Take ownership.
    pub fn buy(&mut self, owner: PlayerId) {
        assert!(self.owner.is_none(), "Project {} is already sold", self.name);
        self.owner = Some(owner);
    }

    /// Return to the bank. Returns the former owner and the sale value.
    pub fn sell(&mut self) -> (PlayerId, i64) {
        let Some(owner) = self.owner.take() else {
            panic!("Project {} has no owner to sell it", self.name);
        };
        (owner, self.sell_value)
    }

    pub(crate) fn clear(&mut self) {
        self.owner = None;
    }
}

/// Subscribe the project at `id` to the commands addressed to it.
pub(crate) fn attach(board: &mut Board, id: ItemId) {
    for kind in [EventKind::BuyPlace, EventKind::SellPlace] {
        board.subscribe(kind, move |board, event| {
            if event.item() == Some(id) {
                on_command(board, id, event);
            }
            false
        });
    }
}

fn on_command(board: &mut Board, id: ItemId, event: &GameEvent) {
    match *event {
        GameEvent::BuyPlace { buyer, .. } => {
            let project = board.project_mut(id);
            project.buy(buyer);
            let price = project.buy_value();
            info!(
                player = board.player(buyer).name(),
                project = board.project(id).name(),
                price,
                "bought project"
            );
            super::sync_listener(board, id);
            board.publish(GameEvent::PlaceBought { place: id, owner: buyer, price });
            board.publish(GameEvent::AddMoney { player: buyer, delta: -price });
        }
        GameEvent::SellPlace { .. } => {
            let (owner, value) = board.project_mut(id).sell();
            info!(
                player = board.player(owner).name(),
                project = board.project(id).name(),
                value,
                "sold project"
            );
            super::sync_listener(board, id);
            board.publish(GameEvent::PlaceSold { place: id, former_owner: owner, value });
            board.publish(GameEvent::AddMoney { player: owner, delta: value });
        }
        _ => {}
    }
}

/// `player` landed on the project at `id`.
pub(crate) fn trigger(board: &mut Board, id: ItemId, player: PlayerId) {
    let project = board.project(id);
    let Some(owner) = project.owner() else {
        board.publish(GameEvent::BuyDecision { player, place: id });
        return;
    };
    let visitor = owner != player;
    let config = board.config();

    match project.kind() {
        ProjectKind::Nuclear if visitor => {
            let level = board.highest_estate_level(player) as i64;
            let fee = config.nuclear_unit + config.nuclear_unit * level;
            info!(player = board.player(player).name(), fee, "pays nuclear fee");
            board.transfer(player, owner, fee);
        }
        ProjectKind::Sewerage if visitor => {
            let estates = board.player(player).estates().len() as i64;
            let fee = config.sewerage_unit + config.sewerage_unit * (estates / 3);
            info!(player = board.player(player).name(), fee, "pays sewerage fee");
            board.transfer(player, owner, fee);
        }
        ProjectKind::Transportation => {
            let transit_fee = config.transit_fee;
            if visitor {
                let fee = config.transportation_fee(board.transportation_count(owner));
                info!(player = board.player(player).name(), fee, "pays transportation fee");
                board.transfer(player, owner, fee);
            }
            let jumped = check_any_true(&board.publish(GameEvent::JumpDecision { player, delay: 1 }));
            if jumped && visitor {
                info!(player = board.player(player).name(), fee = transit_fee, "pays transit fee");
                board.transfer(player, owner, transit_fee);
            }
        }
        ProjectKind::Builder => {
            board.publish(GameEvent::UpgradeAnyDecision { player });
        }
        ProjectKind::Nuclear | ProjectKind::Sewerage | ProjectKind::TvStation => {}
    }
}

/// Subscriptions an owned Builder or TV station holds.
pub(crate) fn listen(board: &mut Board, id: ItemId, kind: ProjectKind) -> ListenerGuard {
    let mut guard = ListenerGuard::default();
    match kind {
        ProjectKind::Builder => {
            let sub = board.subscribe(EventKind::EstateUpgraded, move |board, _| {
                let amount = board.config().builder_reward;
                reward(board, id, amount);
                false
            });
            guard.push(EventKind::EstateUpgraded, sub);
        }
        ProjectKind::TvStation => {
            let sub = board.subscribe(EventKind::NewsOrLuckDrawn, move |board, _| {
                let amount = board.config().tv_reward;
                reward(board, id, amount);
                false
            });
            guard.push(EventKind::NewsOrLuckDrawn, sub);
        }
        _ => {}
    }
    guard
}

fn reward(board: &mut Board, id: ItemId, amount: i64) {
    let project = board.project(id);
    if let Some(owner) = project.owner() {
        info!(
            player = board.player(owner).name(),
            project = project.name(),
            amount,
            "project reward"
        );
        board.publish(GameEvent::AddMoney { player: owner, delta: amount });
    }
}
