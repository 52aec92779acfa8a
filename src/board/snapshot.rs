//! Board snapshots for rollback.
//!
//! A snapshot covers everything that changes during play: squares, players,
//! turn order and round counters. A deep snapshot also carries the dice, so
//! a rollback replays the same rolls; a shallow one leaves the dice running.
//! Layout, strategies and permanent subscriptions never change during play
//! and are not captured. Conditional subscriptions are rebuilt from the
//! restored items.

use crate::core::{GameRng, GameRngState, PlayerId};
use crate::places::{self, Item};
use crate::players::Player;
use crate::transaction::Memento;

use super::Board;

/// Captured board state.
#[derive(Clone, Debug)]
pub struct BoardSnapshot {
    items: im::Vector<Item>,
    players: im::Vector<Player>,
    players_in_game: Vec<PlayerId>,
    round: u32,
    current_turn: usize,
    finished: bool,
    rng: Option<GameRngState>,
}

impl BoardSnapshot {
    /// Round counter at capture time.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Does the snapshot carry the dice?
    #[must_use]
    pub fn is_deep(&self) -> bool {
        self.rng.is_some()
    }
}

impl Memento for Board {
    type State = BoardSnapshot;

    fn capture(&self, deep: bool) -> BoardSnapshot {
        BoardSnapshot {
            items: self.items.clone(),
            players: self.players.clone(),
            players_in_game: self.players_in_game.clone(),
            round: self.round,
            current_turn: self.current_turn,
            finished: self.finished,
            rng: deep.then(|| self.rng.state()),
        }
    }

    fn restore(&mut self, state: &BoardSnapshot) {
        assert_eq!(
            self.players.len(),
            state.players.len(),
            "Snapshot of board {} has a different roster",
            self.name
        );
        self.items = state.items.clone();
        self.players = state.players.clone();
        self.players_in_game = state.players_in_game.clone();
        self.round = state.round;
        self.current_turn = state.current_turn;
        self.finished = state.finished;
        if let Some(rng) = &state.rng {
            self.rng = GameRng::from_state(rng);
        }
        self.pending_rollback = None;
        places::sync_all(self);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::{GameConfig, ItemId};
    use crate::events::GameEvent;
    use crate::places::{Estate, Project, ProjectKind, PublicSquare};
    use crate::players::SimpleStrategy;

    fn board() -> (Board, PlayerId) {
        let mut board = Board::new("Snap", GameConfig::new());
        let block = board.add_block("B");
        board.add_item(PublicSquare::start("Start"));
        board.add_item(Estate::new("A", vec![10, 20, 30, 40], 1000, 500, 200, block));
        board.add_item(Project::new("Builder", ProjectKind::Builder, 2000, 1000));
        let alice = board.add_player(Player::new("Alice", 10000), Rc::new(SimpleStrategy::new()));
        (board, alice)
    }

    #[test]
    fn test_restore_items_and_players() {
        let (mut board, alice) = board();
        let before = board.capture(true);

        board.publish(GameEvent::BuyPlace { place: ItemId::new(1), buyer: alice });
        assert_eq!(board.player(alice).money(), 9000);

        board.restore(&before);
        assert_eq!(board.player(alice).money(), 10000);
        assert!(board.player(alice).estates().is_empty());
        assert!(board.estate(ItemId::new(1)).is_available());
    }

    #[test]
    fn test_restore_resyncs_listeners() {
        let (mut board, alice) = board();
        let before = board.capture(false);
        assert!(!before.is_deep());

        board.publish(GameEvent::BuyPlace { place: ItemId::new(2), buyer: alice });
        assert!(board.has_listener(ItemId::new(2)));
        let owned = board.capture(false);

        board.restore(&before);
        assert!(!board.has_listener(ItemId::new(2)));

        board.restore(&owned);
        assert!(board.has_listener(ItemId::new(2)));
    }

    #[test]
    fn test_deep_snapshot_rewinds_dice() {
        let (mut board, _) = board();
        let snapshot = board.capture(true);
        let first: Vec<u32> = (0..5).map(|_| board.rng_mut().roll_die()).collect();

        board.restore(&snapshot);
        let again: Vec<u32> = (0..5).map(|_| board.rng_mut().roll_die()).collect();
        assert_eq!(first, again);

        let shallow = board.capture(false);
        for _ in 0..5 {
            board.rng_mut().roll_die();
        }
        let running = board.rng().state();
        board.restore(&shallow);
        assert_eq!(board.rng().state(), running);
    }
}
