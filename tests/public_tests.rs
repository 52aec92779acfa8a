//! Public squares: start, prison, and the fixed money squares.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{count_events, estate, park, record_events, ring_board, ScriptedStrategy};
use richman::prelude::*;

/// Start, Prison, two parks, Go to prison, a park.
fn prison_board() -> (Board, ItemId, ItemId) {
    let mut board = Board::new("prison", GameConfig::new());
    board.add_item(PublicSquare::start("Start"));
    let prison = board.add_item(PublicSquare::prison("Prison"));
    board.add_item(park("Park 1"));
    board.add_item(park("Park 2"));
    let goto = board.add_item(PublicSquare::goto_prison("Go to prison", prison.index()));
    board.add_item(park("Park 3"));
    (board, prison, goto)
}

/// A prisoner sits out one turn and plays the next.
#[test]
fn test_prison_stay() {
    let (mut board, prison, goto) = prison_board();
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());
    let rolls = count_events(&mut board, EventKind::DiceRolled);
    let passed = count_events(&mut board, EventKind::PassedStart);

    board.trigger(goto, p);
    assert_eq!(board.player(p).position(), prison.index());
    assert!(board.has_listener(prison));
    // Teleporting backwards is not a lap
    assert_eq!(passed.get(), 0);
    let record = board.public(prison).prison_record().unwrap();
    assert_eq!(record.remaining(p), Some(1));

    board.take_the_turn(p);
    assert_eq!(rolls.get(), 0);
    assert_eq!(board.player(p).position(), prison.index());

    // Released at the start of the turn, before the die is cast
    let released = Rc::new(Cell::new(false));
    let seen = Rc::clone(&released);
    board.subscribe(EventKind::DiceRolled, move |board, _| {
        seen.set(!board.has_listener(prison));
        false
    });
    board.take_the_turn(p);
    assert_eq!(rolls.get(), 1);
    assert!(released.get());
}

/// Money changes for an inmate are blocked.
#[test]
fn test_prison_blocks_money() {
    let (mut board, prison, goto) = prison_board();
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());
    let q = board.add_player(Player::new("Q", 20000), ScriptedStrategy::passive());

    board.trigger(goto, p);
    board.transfer(q, p, 1000);
    assert_eq!(board.player(p).money(), 20000);
    // The payer is not in prison and still pays
    assert_eq!(board.player(q).money(), 19000);
    assert!(board.public(prison).prison_record().unwrap().contains(p));
}

/// Every inmate is tracked on their own, and the listener stays until the
/// last one leaves.
#[test]
fn test_prison_two_inmates() {
    // No roll from the prison leads back to it
    let mut board = Board::new("jail", GameConfig::new());
    board.add_item(PublicSquare::start("Start"));
    let prison = board.add_item(PublicSquare::prison("Prison"));
    for i in 0..6 {
        board.add_item(park(&format!("Park {}", i + 1)));
    }
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());
    let q = board.add_player(Player::new("Q", 20000), ScriptedStrategy::passive());

    board.trigger(prison, p);
    board.take_the_turn(p);
    board.trigger(prison, q);

    // P leaves, Q is still inside
    board.take_the_turn(p);
    assert!(board.has_listener(prison));
    let record = board.public(prison).prison_record().unwrap();
    assert!(!record.contains(p));
    assert_eq!(record.remaining(q), Some(1));

    board.publish(GameEvent::PlayerEliminated { player: q });
    assert!(!board.has_listener(prison));
}

/// One start bonus per lap crossed, nothing for the squares in between.
#[test]
fn test_start_bonus_per_lap() {
    let mut board = ring_board(2);
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());
    let rolls = record_events(&mut board, EventKind::DiceRolled);
    let passed = count_events(&mut board, EventKind::PassedStart);

    let mut position = 0;
    let mut laps = 0;
    let mut expected = 20000;
    for turn in 0..20 {
        board.take_the_turn(p);
        let value = match rolls.borrow()[turn] {
            GameEvent::DiceRolled { value, .. } => value as usize,
            ref other => panic!("unexpected {:?}", other),
        };
        let total = position + value;
        laps += total / 3;
        position = total % 3;
        expected += 4000 * (total / 3) as i64;
        if position != 0 {
            expected += 300;
        }
        assert_eq!(board.player(p).position(), position);
        assert_eq!(board.player(p).money(), expected);
    }
    assert_eq!(passed.get(), laps);
}

/// Landing on start offers an upgrade of any estate.
#[test]
fn test_start_landing_upgrade() {
    let mut board = Board::new("start", GameConfig::new());
    let block = board.add_block("B");
    let start = board.add_item(PublicSquare::start("Start"));
    let home = board.add_item(estate("Home", [100, 200, 300, 400], 1000, 500, block));
    let strategy = ScriptedStrategy::passive();
    strategy.upgrade_any.set(Some(home));
    let p = board.add_player(Player::new("P", 20000), strategy);

    board.publish(GameEvent::BuyPlace { place: home, buyer: p });
    board.trigger(start, p);
    assert_eq!(board.estate(home).level(), 1);
    assert_eq!(board.player(p).money(), 20000 - 1000 - 300);
}

/// Stock pays per project, tax charges per estate, park pays a flat reward.
#[test]
fn test_money_squares() {
    let mut board = Board::new("money", GameConfig::new());
    let block = board.add_block("B");
    board.add_item(PublicSquare::start("Start"));
    let stock = board.add_item(PublicSquare::new("Stock", PublicKind::Stock));
    let tax = board.add_item(PublicSquare::new("Tax", PublicKind::Tax));
    let rest = board.add_item(park("Park"));
    let a = board.add_item(estate("A", [100, 200, 300, 400], 1000, 500, block));
    let b = board.add_item(estate("B", [100, 200, 300, 400], 1000, 500, block));
    let plant = board.add_item(Project::new("Plant", ProjectKind::Nuclear, 3000, 1500));
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());

    board.trigger(stock, p);
    assert_eq!(board.player(p).money(), 20500);
    board.trigger(tax, p);
    assert_eq!(board.player(p).money(), 20500);
    board.trigger(rest, p);
    assert_eq!(board.player(p).money(), 20800);

    for place in [a, b, plant] {
        board.publish(GameEvent::BuyPlace { place, buyer: p });
    }
    let money = board.player(p).money();
    board.trigger(stock, p);
    assert_eq!(board.player(p).money(), money + 1000);
    board.trigger(tax, p);
    assert_eq!(board.player(p).money(), money + 1000 - 600);
}

/// Drawing news or luck is announced on the bus.
#[test]
fn test_news_and_luck_announce() {
    let mut board = Board::new("cards", GameConfig::new());
    board.add_item(PublicSquare::start("Start"));
    let news = board.add_item(PublicSquare::new("News", PublicKind::News));
    let luck = board.add_item(PublicSquare::new("Luck", PublicKind::Luck));
    let p = board.add_player(Player::new("P", 20000), ScriptedStrategy::passive());
    let drawn = record_events(&mut board, EventKind::NewsOrLuckDrawn);

    board.trigger(news, p);
    board.trigger(luck, p);
    assert_eq!(
        drawn.borrow().as_slice(),
        &[
            GameEvent::NewsOrLuckDrawn { square: news, player: p },
            GameEvent::NewsOrLuckDrawn { square: luck, player: p },
        ]
    );
    assert_eq!(board.player(p).money(), 20000);
}
