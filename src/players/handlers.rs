//! A player's subscriptions.
//!
//! Commands addressed to the player (pay, move, decide) and notifications
//! about places they gain or lose. Decisions are delegated to the player's
//! strategy; choices that break a precondition are dropped with a warning
//! instead of reaching the place.

use tracing::warn;

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::places::Item;

use super::{money, turn};

const SUBSCRIPTIONS: [EventKind; 8] = [
    EventKind::AddMoney,
    EventKind::MoveTo,
    EventKind::BuyDecision,
    EventKind::UpgradeDecision,
    EventKind::JumpDecision,
    EventKind::UpgradeAnyDecision,
    EventKind::PlaceBought,
    EventKind::PlaceSold,
];

/// Subscribe `me` to the events addressed to them.
pub(crate) fn attach(board: &mut Board, me: PlayerId) {
    for kind in SUBSCRIPTIONS {
        board.subscribe(kind, move |board, event| {
            if event.player() == Some(me) {
                on_event(board, me, event)
            } else {
                false
            }
        });
    }
}

fn on_event(board: &mut Board, me: PlayerId, event: &GameEvent) -> bool {
    match *event {
        GameEvent::AddMoney { delta, .. } => {
            money::add_money(board, me, delta);
            false
        }
        GameEvent::MoveTo { position, delay, .. } => {
            turn::push_position(board, me, position, delay);
            false
        }
        GameEvent::BuyDecision { place, .. } => {
            if board.item(place).owner().is_some() {
                return false;
            }
            let strategy = board.strategy(me);
            if strategy.decide_buy(board, me, place) {
                board.publish(GameEvent::BuyPlace { place, buyer: me });
            }
            false
        }
        GameEvent::UpgradeDecision { estate, .. } => {
            if board.estate(estate).is_level_max() {
                return false;
            }
            let strategy = board.strategy(me);
            if strategy.decide_upgrade(board, me, estate) {
                board.publish(GameEvent::UpgradeEstate { estate });
            }
            false
        }
        GameEvent::JumpDecision { delay, .. } => {
            let strategy = board.strategy(me);
            let Some(target) = strategy.decide_jump(board, me) else {
                return false;
            };
            if !owns_estate(board, me, target) || board.estate(target).is_pledged() {
                warn!(player = board.player(me).name(), %target, "jump target not owned or pledged");
                return false;
            }
            turn::push_position(board, me, target.index(), delay);
            true
        }
        GameEvent::UpgradeAnyDecision { .. } => {
            let strategy = board.strategy(me);
            let Some(estate) = strategy.decide_upgrade_any(board, me) else {
                return false;
            };
            let upgradable = owns_estate(board, me, estate) && !board.estate(estate).is_level_max();
            if !upgradable {
                warn!(player = board.player(me).name(), %estate, "cannot upgrade");
                return false;
            }
            if board.player(me).money() <= board.estate(estate).upgrade_value() {
                return false;
            }
            board.publish(GameEvent::UpgradeEstate { estate });
            false
        }
        GameEvent::PlaceBought { place, .. } => {
            let is_estate = matches!(board.item(place), Item::Estate(_));
            board.player_mut(me).add_place(place, is_estate);
            false
        }
        GameEvent::PlaceSold { place, .. } => {
            board.player_mut(me).remove_place(place);
            false
        }
        _ => false,
    }
}

fn owns_estate(board: &Board, me: PlayerId, estate: ItemId) -> bool {
    board.player(me).estates().contains(&estate)
}
