//! Board squares.
//!
//! ## Components
//!
//! - [`Estate`] / [`Block`]: buyable, upgradable squares grouped for fees
//! - [`Project`]: buyable squares with a kind-specific effect
//! - [`PublicSquare`]: unowned squares (start, prison, tax, ...)
//! - [`Item`]: one board position, any of the above
//!
//! Squares react to the bus in two ways. Permanent subscriptions (an
//! estate's command handlers, the start bonus) are set up when the item is
//! added to the board. Conditional ones (an owned Builder, a prison with
//! inmates) live in a [`ListenerGuard`] the board holds for exactly as long
//! as the condition does; [`sync_listener`] acquires or releases it.

pub mod estate;
pub mod project;
pub mod public;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::board::Board;
use crate::core::{ItemId, PlayerId};
use crate::events::{EventKind, SubscriptionId};

pub use estate::{Block, Estate};
pub use project::{Project, ProjectKind};
pub use public::{PrisonRecord, PublicKind, PublicSquare};

/// One board position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Estate(Estate),
    Project(Project),
    Public(PublicSquare),
}

impl Item {
    /// Display name; unique on a board.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Item::Estate(estate) => estate.name(),
            Item::Project(project) => project.name(),
            Item::Public(square) => square.name(),
        }
    }

    /// Owner of an estate or project.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Item::Estate(estate) => estate.owner(),
            Item::Project(project) => project.owner(),
            Item::Public(_) => None,
        }
    }

    #[must_use]
    pub fn as_estate(&self) -> Option<&Estate> {
        match self {
            Item::Estate(estate) => Some(estate),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Item::Project(project) => Some(project),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_public(&self) -> Option<&PublicSquare> {
        match self {
            Item::Public(square) => Some(square),
            _ => None,
        }
    }

    pub(crate) fn as_estate_mut(&mut self) -> Option<&mut Estate> {
        match self {
            Item::Estate(estate) => Some(estate),
            _ => None,
        }
    }

    pub(crate) fn as_project_mut(&mut self) -> Option<&mut Project> {
        match self {
            Item::Project(project) => Some(project),
            _ => None,
        }
    }

    pub(crate) fn as_public_mut(&mut self) -> Option<&mut PublicSquare> {
        match self {
            Item::Public(square) => Some(square),
            _ => None,
        }
    }

    /// The same square as laid out on a fresh board: no owner, no levels,
    /// no pledge, an empty prison.
    #[must_use]
    pub fn layout(&self) -> Item {
        let mut item = self.clone();
        match &mut item {
            Item::Estate(estate) => estate.clear(),
            Item::Project(project) => project.clear(),
            Item::Public(square) => square.clear(),
        }
        item
    }

    /// Should the board hold a listener for this item right now?
    #[must_use]
    pub fn wants_listener(&self) -> bool {
        match self {
            Item::Estate(_) => false,
            Item::Project(project) => {
                project.owner().is_some() && project.kind().listens_while_owned()
            }
            Item::Public(square) => square.prison_record().is_some_and(|record| !record.is_empty()),
        }
    }
}

impl From<Estate> for Item {
    fn from(estate: Estate) -> Self {
        Item::Estate(estate)
    }
}

impl From<Project> for Item {
    fn from(project: Project) -> Self {
        Item::Project(project)
    }
}

impl From<PublicSquare> for Item {
    fn from(square: PublicSquare) -> Self {
        Item::Public(square)
    }
}

/// Subscriptions held on behalf of one item.
///
/// Dropping a guard does not unsubscribe; hand it back to
/// [`ListenerGuard::release`].
#[derive(Debug, Default)]
#[must_use]
pub struct ListenerGuard {
    subscriptions: SmallVec<[(EventKind, SubscriptionId); 4]>,
}

impl ListenerGuard {
    pub(crate) fn push(&mut self, kind: EventKind, id: SubscriptionId) {
        self.subscriptions.push((kind, id));
    }

    /// Subscriptions held.
    pub fn iter(&self) -> impl Iterator<Item = &(EventKind, SubscriptionId)> {
        self.subscriptions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Unsubscribe everything.
    pub fn release(self, board: &mut Board) {
        for (kind, id) in self.subscriptions {
            board.unsubscribe(kind, id);
        }
    }
}

/// Set up the permanent subscriptions of the item at `id`.
pub(crate) fn attach(board: &mut Board, id: ItemId) {
    match board.item(id) {
        Item::Estate(_) => estate::attach(board, id),
        Item::Project(_) => project::attach(board, id),
        Item::Public(_) => public::attach(board, id),
    }
}

/// `player` landed on the item at `id`.
pub(crate) fn trigger(board: &mut Board, id: ItemId, player: PlayerId) {
    match board.item(id) {
        Item::Estate(_) => estate::trigger(board, id, player),
        Item::Project(_) => project::trigger(board, id, player),
        Item::Public(_) => public::trigger(board, id, player),
    }
}

/// Acquire or release the listener of the item at `id` so that it matches
/// [`Item::wants_listener`].
pub(crate) fn sync_listener(board: &mut Board, id: ItemId) {
    let wanted = board.item(id).wants_listener();
    let held = board.has_listener(id);
    if wanted && !held {
        let guard = match board.item(id) {
            Item::Project(owned) => {
                let kind = owned.kind();
                project::listen(board, id, kind)
            }
            Item::Public(_) => public::listen(board, id),
            Item::Estate(_) => ListenerGuard::default(),
        };
        debug!(item = board.item(id).name(), subscriptions = guard.len(), "listener acquired");
        board.insert_listener(id, guard);
    } else if !wanted && held {
        if let Some(guard) = board.take_listener(id) {
            debug!(item = board.item(id).name(), "listener released");
            guard.release(board);
        }
    }
}

/// [`sync_listener`] for every item.
pub(crate) fn sync_all(board: &mut Board) {
    for index in 0..board.len() {
        sync_listener(board, ItemId::from_index(index));
    }
}
