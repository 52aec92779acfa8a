//! Decision strategies.
//!
//! The engine asks a player's [`Strategy`] whenever a choice comes up:
//! buying, upgrading, jumping, and the pre-dice moment where a player may
//! buy pledged estates back or ask for a rollback. Strategies only read the
//! board; the engine carries out what they decide.
//!
//! Two implementations ship with the crate:
//! - [`SimpleStrategy`]: threshold rules, no input needed
//! - [`ConsoleStrategy`]: asks a human over any `BufRead`/`Write` pair

use std::cell::RefCell;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use tracing::warn;

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::places::{Estate, Item};

/// What a player does before rolling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreDice {
    /// Pledged estates to buy back, in order.
    pub rebuy: Vec<ItemId>,
    /// Rewind this many rounds instead of playing the turn.
    pub rollback: Option<u32>,
}

impl PreDice {
    /// Just roll.
    #[must_use]
    pub fn roll() -> Self {
        Self::default()
    }
}

/// A player's decision maker.
pub trait Strategy {
    /// Buy `place`, which `me` just landed on?
    fn decide_buy(&self, board: &Board, me: PlayerId, place: ItemId) -> bool;

    /// Upgrade `estate`, which `me` owns and just landed on?
    fn decide_upgrade(&self, board: &Board, me: PlayerId, estate: ItemId) -> bool;

    /// Estate to jump to on a later turn, if any.
    fn decide_jump(&self, board: &Board, me: PlayerId) -> Option<ItemId>;

    /// Estate to upgrade right now, if any.
    fn decide_upgrade_any(&self, board: &Board, me: PlayerId) -> Option<ItemId>;

    /// Choices before the dice roll.
    fn decide_pre_dice(&self, board: &Board, me: PlayerId) -> PreDice;
}

/// Purchase price of a buyable item.
#[must_use]
pub fn buy_price(item: &Item) -> Option<i64> {
    match item {
        Item::Estate(estate) => Some(estate.buy_value()),
        Item::Project(project) => Some(project.buy_value()),
        Item::Public(_) => None,
    }
}

fn owned_estates<'a>(board: &'a Board, me: PlayerId) -> impl Iterator<Item = (ItemId, &'a Estate)> + 'a {
    board
        .player(me)
        .estates()
        .iter()
        .map(move |&id| (id, board.estate(id)))
}

/// Threshold rules.
///
/// Buys and upgrades whenever the player can afford it outright, jumps to
/// the first unpledged estate it owns, and buys pledged estates back while
/// it keeps at least `reserve` in cash.
#[derive(Clone, Debug)]
pub struct SimpleStrategy {
    reserve: i64,
}

impl SimpleStrategy {
    pub fn new() -> Self {
        Self { reserve: 5000 }
    }

    /// Cash to keep when buying pledged estates back.
    pub fn with_reserve(mut self, reserve: i64) -> Self {
        self.reserve = reserve;
        self
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for SimpleStrategy {
    fn decide_buy(&self, board: &Board, me: PlayerId, place: ItemId) -> bool {
        buy_price(board.item(place)).is_some_and(|price| board.player(me).money() > price)
    }

    fn decide_upgrade(&self, board: &Board, me: PlayerId, estate: ItemId) -> bool {
        let estate = board.estate(estate);
        !estate.is_level_max() && board.player(me).money() > estate.upgrade_value()
    }

    fn decide_jump(&self, board: &Board, me: PlayerId) -> Option<ItemId> {
        owned_estates(board, me)
            .find(|(_, estate)| !estate.is_pledged())
            .map(|(id, _)| id)
    }

    fn decide_upgrade_any(&self, board: &Board, me: PlayerId) -> Option<ItemId> {
        let money = board.player(me).money();
        owned_estates(board, me)
            .find(|(_, estate)| !estate.is_level_max() && money > estate.upgrade_value())
            .map(|(id, _)| id)
    }

    fn decide_pre_dice(&self, board: &Board, me: PlayerId) -> PreDice {
        let mut money = board.player(me).money();
        let mut rebuy = Vec::new();
        for (id, estate) in owned_estates(board, me) {
            if estate.is_pledged() && money - estate.rebuy_value() >= self.reserve {
                money -= estate.rebuy_value();
                rebuy.push(id);
            }
        }
        PreDice { rebuy, rollback: None }
    }
}

/// Asks a human.
///
/// Prompts go to `output`, answers come from `input` one line at a time.
/// End of input answers "no" to everything.
pub struct ConsoleStrategy<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl ConsoleStrategy<StdinLock<'static>, Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleStrategy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }

    fn show(&self, print: impl FnOnce(&mut W) -> io::Result<()>) {
        let mut output = self.output.borrow_mut();
        if let Err(err) = print(&mut output).and_then(|()| output.flush()) {
            warn!(%err, "console write failed");
        }
    }

    fn ask(&self, prompt: &str) -> Option<String> {
        self.show(|output| write!(output, "{} ", prompt));
        let mut line = String::new();
        match self.input.borrow_mut().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                warn!(%err, "console read failed");
                None
            }
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.ask(&format!("{} [y/N]", prompt))
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn choose(&self, prompt: &str, options: &[(ItemId, String)]) -> Option<ItemId> {
        if options.is_empty() {
            return None;
        }
        self.show(|output| {
            writeln!(output, "{}", prompt)?;
            for (number, (_, label)) in options.iter().enumerate() {
                writeln!(output, "  {}) {}", number + 1, label)?;
            }
            Ok(())
        });
        let answer = self.ask("number (empty to skip):")?;
        let number: usize = answer.parse().ok()?;
        options.get(number.checked_sub(1)?).map(|(id, _)| *id)
    }
}

impl<R: BufRead, W: Write> Strategy for ConsoleStrategy<R, W> {
    fn decide_buy(&self, board: &Board, me: PlayerId, place: ItemId) -> bool {
        let item = board.item(place);
        let price = buy_price(item).unwrap_or_default();
        self.confirm(&format!(
            "{}: buy {} for {} (cash {})?",
            board.player(me).name(),
            item.name(),
            price,
            board.player(me).money()
        ))
    }

    fn decide_upgrade(&self, board: &Board, me: PlayerId, estate: ItemId) -> bool {
        let estate = board.estate(estate);
        if estate.is_level_max() {
            return false;
        }
        self.confirm(&format!(
            "{}: upgrade {} to level {} for {}?",
            board.player(me).name(),
            estate.name(),
            estate.level() + 1,
            estate.upgrade_value()
        ))
    }

    fn decide_jump(&self, board: &Board, me: PlayerId) -> Option<ItemId> {
        let options: Vec<_> = owned_estates(board, me)
            .filter(|(_, estate)| !estate.is_pledged())
            .map(|(id, estate)| (id, estate.name().to_owned()))
            .collect();
        self.choose(&format!("{}: jump to one of your estates next turn?", board.player(me).name()), &options)
    }

    fn decide_upgrade_any(&self, board: &Board, me: PlayerId) -> Option<ItemId> {
        let money = board.player(me).money();
        let options: Vec<_> = owned_estates(board, me)
            .filter(|(_, estate)| !estate.is_level_max() && money > estate.upgrade_value())
            .map(|(id, estate)| {
                (id, format!("{} (level {}, costs {})", estate.name(), estate.level(), estate.upgrade_value()))
            })
            .collect();
        self.choose(&format!("{}: upgrade one of your estates?", board.player(me).name()), &options)
    }

    fn decide_pre_dice(&self, board: &Board, me: PlayerId) -> PreDice {
        let prompt = format!(
            "{} (cash {}): [enter] roll, r = buy back pledged estates, u N = undo N rounds:",
            board.player(me).name(),
            board.player(me).money()
        );
        let Some(answer) = self.ask(&prompt) else {
            return PreDice::roll();
        };
        parse_pre_dice(&answer, || {
            owned_estates(board, me)
                .filter(|(_, estate)| estate.is_pledged())
                .map(|(id, _)| id)
                .collect()
        })
    }
}

fn parse_pre_dice(answer: &str, pledged: impl FnOnce() -> Vec<ItemId>) -> PreDice {
    let mut words = answer.split_whitespace();
    match words.next() {
        Some("r") => PreDice {
            rebuy: pledged(),
            rollback: None,
        },
        Some("u") => PreDice {
            rebuy: Vec::new(),
            rollback: Some(words.next().and_then(|n| n.parse().ok()).unwrap_or(1)),
        },
        _ => PreDice::roll(),
    }
}
