//! Synchronous publish/subscribe bus.
//!
//! The bus stores handlers per event kind and delivers events to them in
//! subscription order. Delivery is immediate and reentrant: a handler may
//! publish further events, which run to completion before the outer handler
//! continues. There is no queue.
//!
//! The bus lives inside its host (the board), and handlers receive the host
//! mutably. Publishing is therefore a free function over the host rather than
//! a bus method: the handler list for the kind is cloned out first, then each
//! handler is called with `&mut host`.
//!
//! ## Example
//!
//! ```
//! use richman::events::{publish, Event, EventBus, EventHost};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Ping { Ping }
//! impl Event for Ping {
//!     type Kind = Ping;
//!     fn kind(&self) -> Ping { *self }
//! }
//!
//! struct Counter { hits: u32, bus: EventBus<Counter, Ping> }
//! impl EventHost<Ping> for Counter {
//!     fn bus(&self) -> &EventBus<Self, Ping> { &self.bus }
//!     fn bus_mut(&mut self) -> &mut EventBus<Self, Ping> { &mut self.bus }
//! }
//!
//! let mut counter = Counter { hits: 0, bus: EventBus::new() };
//! counter.bus.subscribe(Ping::Ping, |c: &mut Counter, _| { c.hits += 1; false });
//! let results = publish(&mut counter, &Ping::Ping);
//! assert_eq!(counter.hits, 1);
//! assert!(!results.any_true());
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Something that can be published on an [`EventBus`].
pub trait Event {
    /// The tag handlers subscribe to.
    type Kind: Copy + Eq + Hash + Debug;

    /// Tag of this event.
    fn kind(&self) -> Self::Kind;
}

/// Event handler. The return value is a vote for blocking queries.
pub type Handler<H, E> = Rc<dyn Fn(&mut H, &E) -> bool>;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// Results of one publish: each handler that ran, with its return value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    results: SmallVec<[(SubscriptionId, bool); 4]>,
}

impl Dispatch {
    /// True if any handler returned true.
    #[must_use]
    pub fn any_true(&self) -> bool {
        self.results.iter().any(|&(_, vote)| vote)
    }

    /// Number of handlers that ran.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no handler ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over (subscription, return value) pairs in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &(SubscriptionId, bool)> {
        self.results.iter()
    }

    fn push(&mut self, id: SubscriptionId, vote: bool) {
        self.results.push((id, vote));
    }
}

/// True if any handler in `results` returned true.
///
/// This is the voting combinator behind the blocking queries: a turn or a
/// money change is blocked if any subscriber says so.
#[must_use]
pub fn check_any_true(results: &Dispatch) -> bool {
    results.any_true()
}

/// Handler table keyed by event kind.
pub struct EventBus<H, E: Event> {
    /// Handlers per kind, in subscription order.
    handlers: FxHashMap<E::Kind, Vec<(SubscriptionId, Handler<H, E>)>>,

    /// Next subscription ID to allocate.
    next_id: u32,

    /// Current nesting of publishes.
    depth: u32,

    /// Nesting limit; exceeding it means handlers are feeding each other.
    max_depth: u32,
}

impl<H, E: Event> Default for EventBus<H, E> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
            next_id: 0,
            depth: 0,
            max_depth: 64,
        }
    }
}

impl<H, E: Event> Debug for EventBus<H, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: FxHashMap<_, _> = self
            .handlers
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("handlers", &counts)
            .field("next_id", &self.next_id)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<H, E: Event> EventBus<H, E> {
    /// Create a new empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus with a custom nesting limit.
    pub fn with_max_depth(max_depth: u32) -> Self {
        assert!(max_depth > 0, "Dispatch depth limit must be at least 1");
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Subscribe a handler to an event kind, returns its ID.
    pub fn subscribe<F>(&mut self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: Fn(&mut H, &E) -> bool + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Unsubscribe a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, kind: E::Kind, id: SubscriptionId) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(&kind);
        }
        removed
    }

    /// Is `id` currently subscribed to `kind`?
    #[must_use]
    pub fn is_subscribed(&self, kind: E::Kind, id: SubscriptionId) -> bool {
        self.handlers
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(sid, _)| *sid == id))
    }

    /// Number of handlers subscribed to `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Total number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// True if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Current publish nesting depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn snapshot(&self, kind: E::Kind) -> Vec<(SubscriptionId, Handler<H, E>)> {
        self.handlers.get(&kind).cloned().unwrap_or_default()
    }

    fn enter(&mut self) {
        self.depth += 1;
        assert!(
            self.depth <= self.max_depth,
            "Event dispatch nested deeper than {} levels",
            self.max_depth
        );
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// A type that owns an [`EventBus`] and is handed to its handlers.
pub trait EventHost<E: Event>: Sized {
    /// The host's bus.
    fn bus(&self) -> &EventBus<Self, E>;

    /// The host's bus, mutably.
    fn bus_mut(&mut self) -> &mut EventBus<Self, E>;
}

/// Publish `event` to every handler subscribed to its kind.
///
/// Handlers run in subscription order against the handler list as it was
/// when the publish started. A handler unsubscribed by an earlier handler of
/// the same publish is skipped. Publishing with no subscribers is a no-op.
/// A panicking handler propagates to the caller.
pub fn publish<H, E>(host: &mut H, event: &E) -> Dispatch
where
    H: EventHost<E>,
    E: Event,
{
    let kind = event.kind();
    let handlers = host.bus().snapshot(kind);
    let mut results = Dispatch::default();
    if handlers.is_empty() {
        return results;
    }

    host.bus_mut().enter();
    for (id, handler) in handlers {
        if !host.bus().is_subscribed(kind, id) {
            continue;
        }
        let vote = handler(host, event);
        results.push(id, vote);
    }
    host.bus_mut().leave();

    results
}
