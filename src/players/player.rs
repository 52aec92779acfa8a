//! Player state.
//!
//! A player is plain data: money, position, the places they own and the
//! moves queued for later turns. Everything that involves other entities
//! (paying rent, buying, recovering from debt) goes through the bus and
//! lives in [`super::money`], [`super::turn`] and [`super::handlers`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ItemId, PlayerId};

/// A move queued for a later turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedMove {
    /// Target board position.
    pub position: usize,
    /// Turns left before the move happens.
    pub turns: u32,
}

/// One participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    money: i64,
    position: usize,

    /// Owned estates, in board order.
    estates: Vec<ItemId>,
    /// Owned projects, in board order.
    projects: Vec<ItemId>,

    delayed: SmallVec<[DelayedMove; 2]>,
    bankrupt: bool,
    making_money: bool,
}

impl Player {
    /// Create a player with `money` at the start square.
    ///
    /// The id is assigned when the player is added to a board.
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        let name = name.into();
        assert!(money > 0, "Player {} needs positive starting money", name);
        Self {
            id: PlayerId::new(0),
            name,
            money,
            position: 0,
            estates: Vec::new(),
            projects: Vec::new(),
            delayed: SmallVec::new(),
            bankrupt: false,
            making_money: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn money(&self) -> i64 {
        self.money
    }

    /// Current board position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn estates(&self) -> &[ItemId] {
        &self.estates
    }

    #[must_use]
    pub fn projects(&self) -> &[ItemId] {
        &self.projects
    }

    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        self.bankrupt
    }

    /// Is debt recovery running for this player?
    #[must_use]
    pub fn is_making_money(&self) -> bool {
        self.making_money
    }

    /// Queued moves.
    #[must_use]
    pub fn delayed_moves(&self) -> &[DelayedMove] {
        &self.delayed
    }

    pub(crate) fn set_id(&mut self, id: PlayerId) {
        self.id = id;
    }

    /// Add `delta` and return the new balance.
    pub(crate) fn apply_money(&mut self, delta: i64) -> i64 {
        self.money += delta;
        self.money
    }

    pub(crate) fn set_making_money(&mut self, making_money: bool) {
        self.making_money = making_money;
    }

    pub(crate) fn declare_bankrupt(&mut self) {
        assert!(
            self.estates.is_empty() && self.projects.is_empty(),
            "{} still owns places and cannot go bankrupt",
            self.name
        );
        self.bankrupt = true;
    }

    /// Record a newly bought place, keeping board order.
    pub(crate) fn add_place(&mut self, place: ItemId, is_estate: bool) {
        let list = if is_estate { &mut self.estates } else { &mut self.projects };
        match list.binary_search(&place) {
            Ok(_) => panic!("{} already owns {}", self.name, place),
            Err(index) => list.insert(index, place),
        }
    }

    /// Forget a sold place. Returns false if it was not owned.
    pub(crate) fn remove_place(&mut self, place: ItemId) -> bool {
        for list in [&mut self.estates, &mut self.projects] {
            if let Ok(index) = list.binary_search(&place) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Move `steps` squares forward on a board of `board_len` squares.
    /// Returns the number of times the start line was crossed.
    pub(crate) fn advance(&mut self, steps: usize, board_len: usize) -> usize {
        assert!(board_len > 0, "Cannot move on an empty board");
        let total = self.position + steps;
        self.position = total % board_len;
        total / board_len
    }

    /// Put the player on `position` (wrapped onto the board).
    pub(crate) fn place_at(&mut self, position: usize, board_len: usize) {
        assert!(board_len > 0, "Cannot move on an empty board");
        self.position = position % board_len;
    }

    /// Queue a move `turns` turns from now.
    pub(crate) fn push_delayed(&mut self, position: usize, turns: u32) {
        assert!(turns > 0, "A delayed move needs a delay");
        self.delayed.push(DelayedMove { position, turns });
    }

    /// Count every queued move down by one turn and return the one that is
    /// due, if any.
    pub(crate) fn pull_delayed(&mut self) -> Option<usize> {
        for entry in &mut self.delayed {
            entry.turns -= 1;
        }
        let due: SmallVec<[usize; 2]> = self
            .delayed
            .iter()
            .filter(|entry| entry.turns == 0)
            .map(|entry| entry.position)
            .collect();
        assert!(due.len() <= 1, "{} has {} moves due at once", self.name, due.len());
        self.delayed.retain(|entry| entry.turns > 0);
        due.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player() {
        let player = Player::new("Alice", 20000);
        assert_eq!(player.name(), "Alice");
        assert_eq!(player.money(), 20000);
        assert_eq!(player.position(), 0);
        assert!(!player.is_bankrupt());
        assert!(player.estates().is_empty());
    }

    #[test]
    #[should_panic(expected = "positive starting money")]
    fn test_zero_money() {
        let _ = Player::new("Broke", 0);
    }

    #[test]
    fn test_places_stay_sorted() {
        let mut player = Player::new("Alice", 100);
        player.add_place(ItemId::new(7), true);
        player.add_place(ItemId::new(2), true);
        player.add_place(ItemId::new(4), false);
        player.add_place(ItemId::new(5), true);
        assert_eq!(player.estates(), &[ItemId::new(2), ItemId::new(5), ItemId::new(7)]);
        assert_eq!(player.projects(), &[ItemId::new(4)]);

        assert!(player.remove_place(ItemId::new(5)));
        assert!(player.remove_place(ItemId::new(4)));
        assert!(!player.remove_place(ItemId::new(4)));
        assert_eq!(player.estates(), &[ItemId::new(2), ItemId::new(7)]);
        assert!(player.projects().is_empty());
    }

    #[test]
    #[should_panic(expected = "already owns")]
    fn test_add_owned_place() {
        let mut player = Player::new("Alice", 100);
        player.add_place(ItemId::new(1), true);
        player.add_place(ItemId::new(1), true);
    }

    #[test]
    fn test_advance_counts_laps() {
        let mut player = Player::new("Alice", 100);
        assert_eq!(player.advance(5, 10), 0);
        assert_eq!(player.position(), 5);
        assert_eq!(player.advance(5, 10), 1);
        assert_eq!(player.position(), 0);
        assert_eq!(player.advance(23, 10), 2);
        assert_eq!(player.position(), 3);
    }

    #[test]
    fn test_delayed_queue() {
        let mut player = Player::new("Alice", 100);
        player.push_delayed(4, 1);
        player.push_delayed(9, 2);

        assert_eq!(player.pull_delayed(), Some(4));
        assert_eq!(player.delayed_moves().len(), 1);
        assert_eq!(player.pull_delayed(), Some(9));
        assert_eq!(player.pull_delayed(), None);
    }

    #[test]
    #[should_panic(expected = "moves due at once")]
    fn test_two_moves_due() {
        let mut player = Player::new("Alice", 100);
        player.push_delayed(4, 1);
        player.push_delayed(9, 1);
        player.pull_delayed();
    }

    #[test]
    #[should_panic(expected = "cannot go bankrupt")]
    fn test_bankrupt_with_places() {
        let mut player = Player::new("Alice", 100);
        player.add_place(ItemId::new(1), true);
        player.declare_bankrupt();
    }
}
