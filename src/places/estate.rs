//! Estates and blocks.
//!
//! An estate is a buyable square with a levelled fee table. Estates are
//! grouped into blocks; a visitor landing on an owned estate pays the
//! *block fee*: the sum of the current fees of every unpledged estate in
//! the block held by the same owner.
//!
//! ## Mutations
//!
//! `buy`, `sell`, `upgrade`, `degrade`, `pledge` and `rebuy` are guarded by
//! preconditions that panic when broken. Players reach them through command
//! events (`BuyPlace`, `UpgradeEstate`, ...) after a decision hook; each
//! handled command is followed by a notification (`PlaceBought`,
//! `EstateUpgraded`, ...) other entities can react to.
//!
//! ## Sale value
//!
//! Selling an unpledged estate returns its buy value. Selling a pledged
//! estate returns `buy_value - pledge_value`, since the pledge money was
//! already paid out. Rebuying a pledged estate costs its pledge value.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::core::{BlockId, ItemId, PlayerId};
use crate::events::{EventKind, GameEvent};

/// A buyable, upgradable square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    name: String,
    fees: Vec<i64>,
    buy_value: i64,
    pledge_value: i64,
    upgrade_value: i64,
    block: BlockId,

    owner: Option<PlayerId>,
    level: usize,
    pledged: bool,
}

impl Estate {
    /// Create a new unowned estate at level 0.
    ///
    /// Panics unless the fee table is non-empty and sorted ascending and the
    /// sale value exceeds the pledge value.
    pub fn new(
        name: impl Into<String>,
        fees: Vec<i64>,
        buy_value: i64,
        pledge_value: i64,
        upgrade_value: i64,
        block: BlockId,
    ) -> Self {
        let name = name.into();
        assert!(!fees.is_empty(), "Estate {} needs a fee table", name);
        assert!(
            fees.windows(2).all(|w| w[0] <= w[1]),
            "Fees of estate {} should go up with level",
            name
        );
        assert!(pledge_value >= 0, "Estate {} has a negative pledge value", name);
        assert!(
            buy_value > pledge_value,
            "Sale value of estate {} must exceed its pledge value",
            name
        );

        Self {
            name,
            fees,
            buy_value,
            pledge_value,
            upgrade_value,
            block,
            owner: None,
            level: 0,
            pledged: false,
        }
    }

    /// Estate name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The block this estate belongs to.
    #[must_use]
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Current level (0-based).
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of levels in the fee table.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.fees.len()
    }

    /// True at the top level.
    #[must_use]
    pub fn is_level_max(&self) -> bool {
        self.level + 1 >= self.fees.len()
    }

    /// Is the estate pledged to the bank?
    #[must_use]
    pub fn is_pledged(&self) -> bool {
        self.pledged
    }

    /// Is the estate up for sale?
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.owner.is_none()
    }

    /// Fee at the current level.
    #[must_use]
    pub fn fee(&self) -> i64 {
        self.fees[self.level]
    }

    /// Fee at `level`.
    #[must_use]
    pub fn fee_at(&self, level: usize) -> i64 {
        self.fees[level]
    }

    /// The whole fee table.
    #[must_use]
    pub fn fees(&self) -> &[i64] {
        &self.fees
    }

    /// Purchase price.
    #[must_use]
    pub fn buy_value(&self) -> i64 {
        self.buy_value
    }

    /// Money paid out when pledging.
    #[must_use]
    pub fn pledge_value(&self) -> i64 {
        self.pledge_value
    }

    /// Price of buying a pledged estate back.
    #[must_use]
    pub fn rebuy_value(&self) -> i64 {
        self.pledge_value
    }

    /// Cost of one upgrade.
    #[must_use]
    pub fn upgrade_value(&self) -> i64 {
        self.upgrade_value
    }

    /// Money the owner gets for selling right now.
    #[must_use]
    pub fn sell_value(&self) -> i64 {
        if self.pledged {
            self.buy_value - self.pledge_value
        } else {
            self.buy_value
        }
    }

    /// Take ownership.
    pub fn buy(&mut self, owner: PlayerId) {
        assert!(self.owner.is_none(), "Estate {} is already sold", self.name);
        self.owner = Some(owner);
    }

    /// Return the estate to the bank. Returns the former owner and the
    /// sale value; level and pledge are reset.
    pub fn sell(&mut self) -> (PlayerId, i64) {
        let Some(owner) = self.owner else {
            panic!("Estate {} has no owner to sell it", self.name);
        };
        let value = self.sell_value();
        self.owner = None;
        self.level = 0;
        self.pledged = false;
        (owner, value)
    }

    /// Raise the level by one. Returns the new level.
    pub fn upgrade(&mut self) -> usize {
        assert!(self.owner.is_some(), "Estate {} has no owner to upgrade it", self.name);
        assert!(!self.is_level_max(), "Estate {} is already at the top level", self.name);
        self.level += 1;
        self.level
    }

    /// Lower the level by one. Returns the new level.
    pub fn degrade(&mut self) -> usize {
        assert!(self.level > 0, "Estate {} is already at the lowest level", self.name);
        self.level -= 1;
        self.level
    }

    /// Pledge to the bank. Returns the owner and the pledge value.
    pub fn pledge(&mut self) -> (PlayerId, i64) {
        let Some(owner) = self.owner else {
            panic!("Estate {} has no owner to pledge it", self.name);
        };
        assert!(!self.pledged, "Estate {} is already pledged", self.name);
        self.pledged = true;
        (owner, self.pledge_value)
    }

    /// Buy back from the bank. Returns the owner and the rebuy price.
    pub fn rebuy(&mut self) -> (PlayerId, i64) {
        let Some(owner) = self.owner else {
            panic!("Estate {} has no owner to rebuy it", self.name);
        };
        assert!(self.pledged, "Estate {} is not pledged", self.name);
        self.pledged = false;
        (owner, self.rebuy_value())
    }

    /// Back to the bank's shelf: unowned, level 0, unpledged.
    pub(crate) fn clear(&mut self) {
        self.owner = None;
        self.level = 0;
        self.pledged = false;
    }
}

/// A group of estates sharing the block-fee rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    name: String,
    members: Vec<ItemId>,
}

impl Block {
    /// Create an empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member estates in board order.
    #[must_use]
    pub fn members(&self) -> &[ItemId] {
        &self.members
    }

    pub(crate) fn add_member(&mut self, estate: ItemId) {
        assert!(!self.members.contains(&estate), "{} is already in block {}", estate, self.name);
        self.members.push(estate);
    }

    /// Sum of the fees of every unpledged member held by `owner`.
    #[must_use]
    pub fn block_fee(&self, owner: PlayerId, board: &Board) -> i64 {
        self.members
            .iter()
            .map(|&id| board.estate(id))
            .filter(|estate| estate.owner() == Some(owner) && !estate.is_pledged())
            .map(Estate::fee)
            .sum()
    }
}

const COMMANDS: [EventKind; 6] = [
    EventKind::BuyPlace,
    EventKind::SellPlace,
    EventKind::UpgradeEstate,
    EventKind::DegradeEstate,
    EventKind::PledgeEstate,
    EventKind::RebuyEstate,
];

/// Subscribe the estate at `id` to the commands addressed to it.
pub(crate) fn attach(board: &mut Board, id: ItemId) {
    for kind in COMMANDS {
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
            let estate = board.estate_mut(id);
            estate.buy(buyer);
            let price = estate.buy_value();
            info!(
                player = board.player(buyer).name(),
                estate = board.estate(id).name(),
                price,
                "bought estate"
            );
            board.publish(GameEvent::PlaceBought { place: id, owner: buyer, price });
            board.publish(GameEvent::AddMoney { player: buyer, delta: -price });
        }
        GameEvent::SellPlace { .. } => {
            let (owner, value) = board.estate_mut(id).sell();
            info!(
                player = board.player(owner).name(),
                estate = board.estate(id).name(),
                value,
                "sold estate"
            );
            board.publish(GameEvent::PlaceSold { place: id, former_owner: owner, value });
            board.publish(GameEvent::AddMoney { player: owner, delta: value });
        }
        GameEvent::UpgradeEstate { .. } => {
            let estate = board.estate_mut(id);
            let level = estate.upgrade();
            let cost = estate.upgrade_value();
            let Some(owner) = estate.owner() else {
                unreachable!("upgrade checks ownership");
            };
            info!(
                player = board.player(owner).name(),
                estate = board.estate(id).name(),
                level,
                cost,
                "upgraded estate"
            );
            board.publish(GameEvent::EstateUpgraded { estate: id, owner, level });
            board.publish(GameEvent::AddMoney { player: owner, delta: -cost });
        }
        GameEvent::DegradeEstate { .. } => {
            let estate = board.estate_mut(id);
            let level = estate.degrade();
            let Some(owner) = estate.owner() else {
                panic!("Estate {} has no owner to degrade it", estate.name());
            };
            info!(estate = board.estate(id).name(), level, "degraded estate");
            board.publish(GameEvent::EstateDegraded { estate: id, owner, level });
        }
        GameEvent::PledgeEstate { .. } => {
            let (owner, value) = board.estate_mut(id).pledge();
            info!(
                player = board.player(owner).name(),
                estate = board.estate(id).name(),
                value,
                "pledged estate"
            );
            board.publish(GameEvent::EstatePledged { estate: id, owner });
            board.publish(GameEvent::AddMoney { player: owner, delta: value });
        }
        GameEvent::RebuyEstate { .. } => {
            let (owner, cost) = board.estate_mut(id).rebuy();
            info!(
                player = board.player(owner).name(),
                estate = board.estate(id).name(),
                cost,
                "rebought estate"
            );
            board.publish(GameEvent::EstateRebought { estate: id, owner });
            board.publish(GameEvent::AddMoney { player: owner, delta: -cost });
        }
        _ => {}
    }
}

/// `player` landed on the estate at `id`.
pub(crate) fn trigger(board: &mut Board, id: ItemId, player: PlayerId) {
    let estate = board.estate(id);
    match estate.owner() {
        None => {
            board.publish(GameEvent::BuyDecision { player, place: id });
        }
        Some(owner) if owner == player => {
            board.publish(GameEvent::UpgradeDecision { player, estate: id });
        }
        Some(owner) if estate.is_pledged() => {
            info!(
                estate = estate.name(),
                owner = board.player(owner).name(),
                "estate is pledged, no fee"
            );
        }
        Some(owner) => {
            let fee = board.block(estate.block()).block_fee(owner, board);
            info!(
                player = board.player(player).name(),
                owner = board.player(owner).name(),
                estate = estate.name(),
                fee,
                "pays block fee"
            );
            board.transfer(player, owner, fee);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hangzhou() -> Estate {
        Estate::new("Hangzhou", vec![100, 200, 300, 400], 2000, 1000, 300, BlockId::new(0))
    }

    #[test]
    fn test_new_estate() {
        let estate = hangzhou();
        assert_eq!(estate.name(), "Hangzhou");
        assert_eq!(estate.level(), 0);
        assert_eq!(estate.fee(), 100);
        assert_eq!(estate.level_count(), 4);
        assert!(estate.is_available());
        assert!(!estate.is_pledged());
        assert!(estate.sell_value() > estate.pledge_value());
    }

    #[test]
    #[should_panic(expected = "should go up with level")]
    fn test_unsorted_fees() {
        let _ = Estate::new("Bad", vec![300, 200, 100, 400], 2000, 1000, 300, BlockId::new(0));
    }

    #[test]
    #[should_panic(expected = "must exceed its pledge value")]
    fn test_pledge_above_sale() {
        let _ = Estate::new("Bad", vec![1, 2, 3, 4], 1000, 1000, 300, BlockId::new(0));
    }

    #[test]
    fn test_upgrade_and_degrade() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));

        assert_eq!(estate.upgrade(), 1);
        assert_eq!(estate.fee(), 200);
        assert_eq!(estate.upgrade(), 2);
        assert_eq!(estate.upgrade(), 3);
        assert!(estate.is_level_max());
        assert_eq!(estate.fee(), 400);

        assert_eq!(estate.degrade(), 2);
        assert_eq!(estate.fee(), 300);
    }

    #[test]
    #[should_panic(expected = "already at the top level")]
    fn test_upgrade_past_max() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        for _ in 0..4 {
            estate.upgrade();
        }
    }

    #[test]
    #[should_panic(expected = "already at the lowest level")]
    fn test_degrade_below_zero() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        estate.degrade();
    }

    #[test]
    #[should_panic(expected = "already sold")]
    fn test_buy_owned() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        estate.buy(PlayerId::new(1));
    }

    #[test]
    #[should_panic(expected = "already pledged")]
    fn test_pledge_twice() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        estate.pledge();
        estate.pledge();
    }

    #[test]
    #[should_panic(expected = "not pledged")]
    fn test_rebuy_unpledged() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        estate.rebuy();
    }

    #[test]
    #[should_panic(expected = "no owner to sell")]
    fn test_sell_unowned() {
        let mut estate = hangzhou();
        estate.sell();
    }

    #[test]
    fn test_sell_resets_and_values() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(1));
        estate.upgrade();
        assert_eq!(estate.sell(), (PlayerId::new(1), 2000));
        assert!(estate.is_available());
        assert_eq!(estate.level(), 0);

        estate.buy(PlayerId::new(1));
        assert_eq!(estate.pledge(), (PlayerId::new(1), 1000));
        assert_eq!(estate.sell_value(), 1000);
        assert_eq!(estate.sell(), (PlayerId::new(1), 1000));
        assert!(!estate.is_pledged());
    }

    #[test]
    fn test_pledge_and_rebuy() {
        let mut estate = hangzhou();
        estate.buy(PlayerId::new(0));
        assert_eq!(estate.pledge(), (PlayerId::new(0), 1000));
        assert!(estate.is_pledged());
        assert_eq!(estate.rebuy(), (PlayerId::new(0), 1000));
        assert!(!estate.is_pledged());
    }

    #[test]
    fn test_block_members() {
        let mut block = Block::new("B");
        block.add_member(ItemId::new(1));
        block.add_member(ItemId::new(3));
        assert_eq!(block.name(), "B");
        assert_eq!(block.members(), &[ItemId::new(1), ItemId::new(3)]);
    }

    #[test]
    #[should_panic(expected = "already in block")]
    fn test_block_duplicate_member() {
        let mut block = Block::new("B");
        block.add_member(ItemId::new(1));
        block.add_member(ItemId::new(1));
    }
}
