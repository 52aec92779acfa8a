//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use richman::prelude::*;

/// A strategy with fixed answers, set per test.
#[derive(Default)]
pub struct ScriptedStrategy {
    pub buy: Cell<bool>,
    pub upgrade: Cell<bool>,
    pub jump: Cell<Option<ItemId>>,
    pub upgrade_any: Cell<Option<ItemId>>,
    pub pre_dice: RefCell<VecDeque<PreDice>>,
}

impl ScriptedStrategy {
    /// Declines everything.
    pub fn passive() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Buys and upgrades whenever asked.
    pub fn eager() -> Rc<Self> {
        let strategy = Self::default();
        strategy.buy.set(true);
        strategy.upgrade.set(true);
        Rc::new(strategy)
    }

    /// Queue a pre-dice answer; once the queue is empty the player just rolls.
    pub fn then_pre_dice(&self, choice: PreDice) {
        self.pre_dice.borrow_mut().push_back(choice);
    }
}

impl Strategy for ScriptedStrategy {
    fn decide_buy(&self, _board: &Board, _me: PlayerId, _place: ItemId) -> bool {
        self.buy.get()
    }

    fn decide_upgrade(&self, _board: &Board, _me: PlayerId, _estate: ItemId) -> bool {
        self.upgrade.get()
    }

    fn decide_jump(&self, _board: &Board, _me: PlayerId) -> Option<ItemId> {
        self.jump.get()
    }

    fn decide_upgrade_any(&self, _board: &Board, _me: PlayerId) -> Option<ItemId> {
        self.upgrade_any.get()
    }

    fn decide_pre_dice(&self, _board: &Board, _me: PlayerId) -> PreDice {
        self.pre_dice.borrow_mut().pop_front().unwrap_or_default()
    }
}

/// Count events of `kind` published on `board` from now on.
pub fn count_events(board: &mut Board, kind: EventKind) -> Rc<Cell<usize>> {
    let counter = Rc::new(Cell::new(0));
    let seen = Rc::clone(&counter);
    board.subscribe(kind, move |_, _| {
        seen.set(seen.get() + 1);
        false
    });
    counter
}

/// Record every event of `kind` published on `board` from now on.
pub fn record_events(board: &mut Board, kind: EventKind) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    board.subscribe(kind, move |_, event| {
        sink.borrow_mut().push(event.clone());
        false
    });
    log
}

pub fn park(name: &str) -> PublicSquare {
    PublicSquare::new(name, PublicKind::Park)
}

pub fn estate(name: &str, fees: [i64; 4], buy: i64, pledge: i64, block: BlockId) -> Estate {
    Estate::new(name, fees.to_vec(), buy, pledge, 300, block)
}

/// Start, then `parks` park squares.
pub fn ring_board(parks: usize) -> Board {
    let mut board = Board::new("ring", GameConfig::new());
    board.add_item(PublicSquare::start("Start"));
    for i in 0..parks {
        board.add_item(park(&format!("Park {}", i + 1)));
    }
    board
}

/// Check that owners recorded on places and place lists on players agree,
/// and that the bankrupt own nothing.
pub fn assert_consistent(board: &Board) {
    for (index, item) in board.items().enumerate() {
        let id = ItemId::from_index(index);
        if let Some(owner) = item.owner() {
            let player = board.player(owner);
            let listed = player.estates().contains(&id) || player.projects().contains(&id);
            assert!(listed, "{} owns {} but does not list it", player.name(), item.name());
        }
    }
    for player in board.players() {
        for &id in player.estates().iter().chain(player.projects()) {
            assert_eq!(board.item(id).owner(), Some(player.id()), "{} lists {}", player.name(), id);
        }
        assert!(player.estates().windows(2).all(|w| w[0] < w[1]));
        assert!(player.projects().windows(2).all(|w| w[0] < w[1]));
        if player.is_bankrupt() {
            assert!(player.estates().is_empty() && player.projects().is_empty());
        } else {
            assert!(player.money() >= 0, "{} is in debt without being bankrupt", player.name());
        }
    }
}
