//! The money funnel and debt recovery.
//!
//! Every balance change goes through [`add_money`]: it asks the bus whether
//! the change is blocked, applies it, reports it, and starts recovery when
//! the balance drops below zero. Recovery raises cash in a fixed order:
//!
//! 1. Pledge unpledged estates, one at a time
//! 2. Sell estates
//! 3. Sell projects
//!
//! and stops as soon as the balance is back at zero or above. A player who
//! runs out of places while still in debt goes bankrupt.

use tracing::{info, warn};

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{check_any_true, GameEvent};

/// Change `me`'s balance by `delta`.
pub(crate) fn add_money(board: &mut Board, me: PlayerId, delta: i64) {
    if board.player(me).is_bankrupt() {
        return;
    }
    if check_any_true(&board.publish(GameEvent::BlockMoney { player: me, delta })) {
        info!(player = board.player(me).name(), delta, "money change blocked");
        return;
    }

    let balance = board.player_mut(me).apply_money(delta);
    board.publish(GameEvent::MoneyChanged { player: me, delta, balance });

    if balance < 0 && !board.player(me).is_making_money() {
        board.player_mut(me).set_making_money(true);
        make_money(board, me);
        board.player_mut(me).set_making_money(false);
    }
}

fn solvent(board: &Board, me: PlayerId) -> bool {
    board.player(me).money() >= 0
}

fn make_money(board: &mut Board, me: PlayerId) {
    warn!(
        player = board.player(me).name(),
        money = board.player(me).money(),
        "in debt, raising money"
    );

    let unpledged: Vec<ItemId> = board
        .player(me)
        .estates()
        .iter()
        .copied()
        .filter(|&id| !board.estate(id).is_pledged())
        .collect();
    for estate in unpledged {
        board.publish(GameEvent::PledgeEstate { estate });
        if solvent(board, me) {
            return;
        }
    }

    let estates = board.player(me).estates().to_vec();
    for place in estates {
        board.publish(GameEvent::SellPlace { place });
        if solvent(board, me) {
            return;
        }
    }

    let projects = board.player(me).projects().to_vec();
    for place in projects {
        board.publish(GameEvent::SellPlace { place });
        if solvent(board, me) {
            return;
        }
    }

    board.player_mut(me).declare_bankrupt();
    warn!(
        player = board.player(me).name(),
        money = board.player(me).money(),
        "bankrupt"
    );
    board.publish(GameEvent::PlayerBankrupt { player: me });
}
