//! The board: squares, players, dice and the event bus that ties them.
//!
//! ## Components
//!
//! - [`Board`]: registration, lookups and the round loop
//! - `snapshot`: [`Memento`](crate::transaction::Memento) support for rollback
//! - `persist`: saving and loading the map layout
//! - `display`: player tables for the display sink
//!
//! ## Round loop
//!
//! [`Board::run_one_round`] plays one turn for every player still in the
//! game, removes the bankrupt, and reports whether the game goes on:
//!
//! ```
//! use std::rc::Rc;
//! use richman::prelude::*;
//!
//! let mut board = richman::maps::sample_board(GameConfig::new().with_max_rounds(Some(3)));
//! board.add_player(Player::new("Alice", 20000), Rc::new(SimpleStrategy::new()));
//! board.add_player(Player::new("Bob", 20000), Rc::new(SimpleStrategy::new()));
//!
//! while board.run_one_round().unwrap() {}
//! assert!(board.is_over());
//! assert!(board.round() <= 3);
//! ```

mod display;
mod persist;
mod snapshot;

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::core::{BlockId, GameConfig, GameError, GameRng, ItemId, PlayerId, Result};
use crate::events::{self, Dispatch, EventBus, EventHost, EventKind, GameEvent, SubscriptionId};
use crate::places::{self, Block, Estate, Item, ListenerGuard, Project, PublicSquare};
use crate::players::{handlers, turn, Player, Strategy};

pub use display::format_table;
pub use persist::{MAP_MAGIC, MAP_VERSION};
pub use snapshot::BoardSnapshot;

/// A game board with its players.
pub struct Board {
    name: String,
    config: GameConfig,
    blocks: Vec<Block>,
    items: im::Vector<Item>,
    players: im::Vector<Player>,
    strategies: Vec<Rc<dyn Strategy>>,

    /// Players still playing, in turn order.
    players_in_game: Vec<PlayerId>,
    round: u32,
    /// Seat of the player whose turn it is (index into `players_in_game`).
    current_turn: usize,
    finished: bool,

    rng: GameRng,
    bus: EventBus<Board, GameEvent>,
    listeners: FxHashMap<ItemId, ListenerGuard>,
    pending_rollback: Option<u32>,
}

impl EventHost<GameEvent> for Board {
    fn bus(&self) -> &EventBus<Self, GameEvent> {
        &self.bus
    }

    fn bus_mut(&mut self) -> &mut EventBus<Self, GameEvent> {
        &mut self.bus
    }
}

impl Board {
    /// Create an empty board.
    pub fn new(name: impl Into<String>, config: GameConfig) -> Self {
        let mut board = Self {
            name: name.into(),
            blocks: Vec::new(),
            items: im::Vector::new(),
            players: im::Vector::new(),
            strategies: Vec::new(),
            players_in_game: Vec::new(),
            round: 0,
            current_turn: 0,
            finished: false,
            rng: GameRng::new(config.seed),
            bus: EventBus::with_max_depth(config.max_dispatch_depth),
            listeners: FxHashMap::default(),
            pending_rollback: None,
            config,
        };
        board.subscribe(EventKind::RollbackRequested, |board, event| {
            if let GameEvent::RollbackRequested { rounds } = *event {
                board.pending_rollback = Some(rounds);
            }
            false
        });
        board
    }

    // === Registration ===

    /// Add an estate block.
    pub fn add_block(&mut self, name: impl Into<String>) -> BlockId {
        assert!(self.blocks.len() < u16::MAX as usize, "Too many blocks");
        let id = BlockId::new(self.blocks.len() as u16);
        self.blocks.push(Block::new(name));
        id
    }

    /// Append an item at the next position.
    ///
    /// Panics if an item with the same name is already on the board, or if
    /// an estate names an unknown block or has the wrong number of levels.
    pub fn add_item(&mut self, item: impl Into<Item>) -> ItemId {
        let item = item.into();
        assert!(
            self.get_item_position(item.name()).is_none(),
            "Item {} is already on board {}",
            item.name(),
            self.name
        );
        if let Item::Estate(estate) = &item {
            assert!(
                estate.block().index() < self.blocks.len(),
                "Estate {} is in unknown {}",
                estate.name(),
                estate.block()
            );
            assert_eq!(
                estate.level_count(),
                self.config.estate_levels,
                "Estate {} should have {} levels",
                estate.name(),
                self.config.estate_levels
            );
        }

        let id = ItemId::from_index(self.items.len());
        if let Item::Estate(estate) = &item {
            self.blocks[estate.block().index()].add_member(id);
        }
        debug!(item = item.name(), %id, "item added");
        self.items.push_back(item);
        places::attach(self, id);
        places::sync_listener(self, id);
        id
    }

    /// Append items in order.
    pub fn add_items<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        for item in items {
            self.add_item(item);
        }
    }

    /// Register a player at the start square.
    ///
    /// Panics if the board has no items yet or a player with the same name
    /// is already registered.
    pub fn add_player(&mut self, mut player: Player, strategy: Rc<dyn Strategy>) -> PlayerId {
        assert!(!self.items.is_empty(), "Board {} has no items to play on", self.name);
        assert!(
            self.player_by_name(player.name()).is_none(),
            "Player {} is already registered",
            player.name()
        );
        assert!(self.players.len() < u8::MAX as usize, "Too many players");

        let id = PlayerId::new(self.players.len() as u8);
        player.set_id(id);
        info!(player = player.name(), money = player.money(), "player joined");
        self.players.push_back(player);
        self.strategies.push(strategy);
        self.players_in_game.push(id);
        handlers::attach(self, id);
        id
    }

    // === Items ===

    /// Board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of squares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in board order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Item at `id`. Panics past the end of the board.
    #[must_use]
    pub fn item(&self, id: ItemId) -> &Item {
        match self.items.get(id.index()) {
            Some(item) => item,
            None => panic!("No item at {} on board {}", id, self.name),
        }
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> &mut Item {
        let name = &self.name;
        match self.items.get_mut(id.index()) {
            Some(item) => item,
            None => panic!("No item at {} on board {}", id, name),
        }
    }

    /// Estate at `id`. Panics if it is something else.
    #[must_use]
    pub fn estate(&self, id: ItemId) -> &Estate {
        match self.item(id).as_estate() {
            Some(estate) => estate,
            None => panic!("{} is not an estate", id),
        }
    }

    pub(crate) fn estate_mut(&mut self, id: ItemId) -> &mut Estate {
        match self.item_mut(id).as_estate_mut() {
            Some(estate) => estate,
            None => panic!("{} is not an estate", id),
        }
    }

    /// Project at `id`. Panics if it is something else.
    #[must_use]
    pub fn project(&self, id: ItemId) -> &Project {
        match self.item(id).as_project() {
            Some(project) => project,
            None => panic!("{} is not a project", id),
        }
    }

    pub(crate) fn project_mut(&mut self, id: ItemId) -> &mut Project {
        match self.item_mut(id).as_project_mut() {
            Some(project) => project,
            None => panic!("{} is not a project", id),
        }
    }

    /// Public square at `id`. Panics if it is something else.
    #[must_use]
    pub fn public(&self, id: ItemId) -> &PublicSquare {
        match self.item(id).as_public() {
            Some(square) => square,
            None => panic!("{} is not a public square", id),
        }
    }

    pub(crate) fn public_mut(&mut self, id: ItemId) -> &mut PublicSquare {
        match self.item_mut(id).as_public_mut() {
            Some(square) => square,
            None => panic!("{} is not a public square", id),
        }
    }

    /// Position of the item called `name`.
    #[must_use]
    pub fn get_item_position(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|item| item.name() == name)
            .map(ItemId::from_index)
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    // === Players ===

    /// Every registered player, eliminated ones included.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        match self.players.get(id.index()) {
            Some(player) => player,
            None => panic!("{} is not registered", id),
        }
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match self.players.get_mut(id.index()) {
            Some(player) => player,
            None => panic!("{} is not registered", id),
        }
    }

    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name() == name)
    }

    /// Players still playing, in turn order.
    #[must_use]
    pub fn players_in_game(&self) -> &[PlayerId] {
        &self.players_in_game
    }

    pub(crate) fn strategy(&self, id: PlayerId) -> Rc<dyn Strategy> {
        Rc::clone(&self.strategies[id.index()])
    }

    /// Highest level among `player`'s estates (0 without estates).
    #[must_use]
    pub fn highest_estate_level(&self, player: PlayerId) -> usize {
        self.player(player)
            .estates()
            .iter()
            .map(|&id| self.estate(id).level())
            .max()
            .unwrap_or(0)
    }

    /// Number of transportation projects `owner` holds.
    #[must_use]
    pub fn transportation_count(&self, owner: PlayerId) -> usize {
        self.player(owner)
            .projects()
            .iter()
            .filter(|&&id| self.project(id).kind() == places::ProjectKind::Transportation)
            .count()
    }

    /// Cash plus the sale value of every owned place.
    #[must_use]
    pub fn total_assets(&self, player: PlayerId) -> i64 {
        let player = self.player(player);
        let estates: i64 = player.estates().iter().map(|&id| self.estate(id).sell_value()).sum();
        let projects: i64 = player.projects().iter().map(|&id| self.project(id).sell_value()).sum();
        player.money() + estates + projects
    }

    // === Round state ===

    /// Rounds started so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Seat (index into [`Board::players_in_game`]) of the current turn.
    #[must_use]
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// Has the game finished?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.finished
    }

    /// The last player standing, if only one is left.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.players_in_game.as_slice() {
            [winner] => Some(*winner),
            _ => None,
        }
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    pub(crate) fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Events ===

    /// Subscribe a handler; see [`EventBus::subscribe`].
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&mut Board, &GameEvent) -> bool + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    /// Remove a subscription. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(kind, id)
    }

    /// Publish an event to the board's bus.
    pub fn publish(&mut self, event: GameEvent) -> Dispatch {
        events::publish(self, &event)
    }

    /// Move money from `from` to `to`.
    pub fn transfer(&mut self, from: PlayerId, to: PlayerId, amount: i64) {
        self.publish(GameEvent::AddMoney { player: from, delta: -amount });
        self.publish(GameEvent::AddMoney { player: to, delta: amount });
    }

    /// Does the item at `id` currently hold conditional subscriptions?
    #[must_use]
    pub fn has_listener(&self, id: ItemId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub(crate) fn insert_listener(&mut self, id: ItemId, guard: ListenerGuard) {
        let previous = self.listeners.insert(id, guard);
        assert!(previous.is_none(), "{} already holds a listener", id);
    }

    pub(crate) fn take_listener(&mut self, id: ItemId) -> Option<ListenerGuard> {
        self.listeners.remove(&id)
    }

    // === Play ===

    /// `player` lands on the item at `id`.
    pub fn trigger(&mut self, id: ItemId, player: PlayerId) {
        places::trigger(self, id, player);
    }

    /// Play one turn for `player`.
    pub fn take_the_turn(&mut self, player: PlayerId) {
        turn::take_the_turn(self, player);
    }

    /// Play one round.
    ///
    /// Returns `Ok(false)` once the game is over: one player (or none) is
    /// left, or the round limit was reached. A rollback requested during the
    /// round aborts it with [`GameError::RollbackRequested`].
    pub fn run_one_round(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        assert!(!self.players_in_game.is_empty(), "Board {} has no players", self.name);

        self.pending_rollback = None;
        self.round += 1;
        let round = self.round;
        info!(round, "round started");
        self.publish(GameEvent::RoundStarted { round });
        display::render_players(self);

        let order = self.players_in_game.clone();
        for (seat, &player) in order.iter().enumerate() {
            if self.player(player).is_bankrupt() {
                continue;
            }
            self.current_turn = seat;
            turn::take_the_turn(self, player);
            if let Some(rounds) = self.pending_rollback.take() {
                return Err(GameError::RollbackRequested { rounds });
            }
        }

        self.eliminate_bankrupt();
        self.publish(GameEvent::RoundFinished { round });

        if self.players_in_game.len() <= 1 {
            let winner = self.winner();
            self.finish(winner);
            return Ok(false);
        }
        if self.config.max_rounds.is_some_and(|max| round >= max) {
            info!(round, "round limit reached");
            self.finish(None);
            return Ok(false);
        }
        Ok(true)
    }

    fn eliminate_bankrupt(&mut self) {
        let bankrupt: Vec<PlayerId> = self
            .players_in_game
            .iter()
            .copied()
            .filter(|&id| self.player(id).is_bankrupt())
            .collect();
        if bankrupt.is_empty() {
            return;
        }
        self.players_in_game.retain(|id| !bankrupt.contains(id));
        for player in bankrupt {
            info!(player = self.player(player).name(), "eliminated");
            self.publish(GameEvent::PlayerEliminated { player });
        }
    }

    fn finish(&mut self, winner: Option<PlayerId>) {
        self.finished = true;
        let rounds = self.round;
        match winner {
            Some(player) => info!(winner = self.player(player).name(), rounds, "game finished"),
            None => info!(rounds, "game finished without a winner"),
        }
        self.publish(GameEvent::GameFinished { winner, rounds });
        display::render_standings(self);
    }

    /// Drop every subscription, listeners included.
    pub fn destroy(&mut self) {
        let listeners: Vec<ItemId> = self.listeners.keys().copied().collect();
        for id in listeners {
            if let Some(guard) = self.take_listener(id) {
                guard.release(self);
            }
        }
        self.bus.clear();
        debug!(board = %self.name, "board destroyed");
    }

    /// Render the player table to the display sink.
    pub fn render_players(&mut self) {
        display::render_players(self);
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("name", &self.name)
            .field("items", &self.items.len())
            .field("players", &self.players_in_game)
            .field("round", &self.round)
            .field("finished", &self.finished)
            .field("bus", &self.bus)
            .finish()
    }
}
