//! The game loop.
//!
//! A [`Game`] owns a board and a [`Transaction`] over it. Every completed
//! round is committed; a round aborted by a rollback request is rewound
//! instead, and play continues from the restored round.

use std::rc::Rc;

use tracing::{info, warn};

use crate::board::Board;
use crate::core::{GameError, PlayerId, Result};
use crate::players::{Player, Strategy};
use crate::transaction::Transaction;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Last player standing.
    Winner(PlayerId),
    /// Round limit reached, or nobody left.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// A board, its players and their round history.
pub struct Game {
    board: Board,
    transaction: Transaction<Board>,
}

impl Game {
    /// Register `players` on `board` and take the first snapshot.
    pub fn new<I>(mut board: Board, players: I) -> Self
    where
        I: IntoIterator<Item = (Player, Rc<dyn Strategy>)>,
    {
        for (player, strategy) in players {
            board.add_player(player, strategy);
        }
        assert!(!board.players_in_game().is_empty(), "A game needs players");

        let config = board.config();
        let transaction = Transaction::new(config.deep_snapshots, &board, config.rollback_depth, None);
        Self { board, transaction }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Round history.
    #[must_use]
    pub fn transaction(&self) -> &Transaction<Board> {
        &self.transaction
    }

    /// Play one round. Returns false once the game is over.
    ///
    /// A rollback request rewinds the board and counts as a played round.
    /// A request reaching further back than the history is logged and
    /// rewinds as far as possible.
    pub fn step(&mut self) -> Result<bool> {
        match self.board.run_one_round() {
            Ok(true) => {
                self.transaction.commit(&self.board);
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(GameError::RollbackRequested { rounds }) => {
                self.rewind(rounds as usize);
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    fn rewind(&mut self, rounds: usize) {
        match self.transaction.rollback(rounds, &mut self.board) {
            Ok(()) => {
                warn!(rounds, round = self.board.round(), "rolled back");
            }
            Err(err) => {
                let steps = self.transaction.available_steps();
                warn!(%err, steps, "rollback too deep, rewinding as far as possible");
                if let Err(err) = self.transaction.rollback(steps, &mut self.board) {
                    warn!(%err, "rollback failed");
                }
            }
        }
    }

    /// Play until the game is over, then tear the board's subscriptions
    /// down.
    pub fn run(&mut self) -> Result<GameResult> {
        while self.step()? {}
        let result = match self.board.winner() {
            Some(winner) => GameResult::Winner(winner),
            None => GameResult::Draw,
        };
        info!(?result, rounds = self.board.round(), "game over");
        self.board.destroy();
        Ok(result)
    }

    /// Give the board back.
    pub fn into_board(self) -> Board {
        self.board
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("transaction", &self.transaction)
            .finish()
    }
}
