//! Turn sequence and movement.
//!
//! A turn runs:
//!
//! 1. `TurnStarted`
//! 2. `BlockTurn` vote; a blocked turn ends here
//! 3. Pre-dice decision: buy pledged estates back, or request a rollback
//! 4. Pull a due delayed move, or roll the die and advance
//! 5. `DiceRolled`, then one `PassedStart` per lap crossed
//! 6. Trigger the square landed on
//! 7. `TurnFinished`
//!
//! Moves that teleport (a jump, being sent to prison) never count as
//! passing the start.

use tracing::{debug, info};

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{check_any_true, GameEvent};
use crate::places;

/// Play one turn for `me`.
pub(crate) fn take_the_turn(board: &mut Board, me: PlayerId) {
    board.publish(GameEvent::TurnStarted { player: me });

    if check_any_true(&board.publish(GameEvent::BlockTurn { player: me })) {
        info!(player = board.player(me).name(), "turn blocked");
        board.publish(GameEvent::TurnFinished { player: me });
        return;
    }

    let strategy = board.strategy(me);
    let choice = strategy.decide_pre_dice(board, me);
    for estate in choice.rebuy {
        let rebuyable = board.player(me).estates().contains(&estate) && board.estate(estate).is_pledged();
        let affordable = board.player(me).money() >= board.estate(estate).rebuy_value();
        if rebuyable && affordable {
            board.publish(GameEvent::RebuyEstate { estate });
        } else {
            debug!(player = board.player(me).name(), %estate, "rebuy skipped");
        }
    }
    if let Some(rounds) = choice.rollback {
        info!(player = board.player(me).name(), rounds, "requests rollback");
        board.publish(GameEvent::RollbackRequested { rounds });
        return;
    }

    let due = board.player_mut(me).pull_delayed();
    match due {
        Some(position) => {
            info!(player = board.player(me).name(), position, "delayed move");
            trigger_map_item(board, me, position);
        }
        None => {
            let value = board.rng_mut().roll_die();
            let len = board.len();
            let laps = board.player_mut(me).advance(value as usize, len);
            let position = board.player(me).position();
            info!(player = board.player(me).name(), value, position, "rolled");
            board.publish(GameEvent::DiceRolled { player: me, value });
            for _ in 0..laps {
                board.publish(GameEvent::PassedStart { player: me });
            }
            places::trigger(board, ItemId::from_index(position), me);
        }
    }

    board.publish(GameEvent::TurnFinished { player: me });
}

/// Put `me` on `position` and trigger the square there.
pub(crate) fn trigger_map_item(board: &mut Board, me: PlayerId, position: usize) {
    let len = board.len();
    board.player_mut(me).place_at(position, len);
    let position = board.player(me).position();
    places::trigger(board, ItemId::from_index(position), me);
}

/// Move `me` to `position` now (`delay == 0`) or `delay` turns from now.
pub(crate) fn push_position(board: &mut Board, me: PlayerId, position: usize, delay: u32) {
    if delay == 0 {
        trigger_map_item(board, me, position);
    } else {
        debug!(player = board.player(me).name(), position, delay, "move queued");
        board.player_mut(me).push_delayed(position, delay);
    }
}
