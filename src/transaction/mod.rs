//! Snapshot history with bounded depth.
//!
//! A [`Transaction`] keeps the last `max_depth` snapshots of a target that
//! implements [`Memento`]. `commit` appends one (dropping the oldest when
//! full); `rollback(steps)` discards the newest `steps` snapshots and
//! restores the target from the one that is then newest. That snapshot stays
//! in the history, so rolling back twice by zero steps restores the same
//! state twice.
//!
//! ```
//! use richman::transaction::{Memento, Transaction};
//!
//! #[derive(Debug, PartialEq)]
//! struct Counter(i32);
//!
//! impl Memento for Counter {
//!     type State = i32;
//!     fn capture(&self, _deep: bool) -> i32 {
//!         self.0
//!     }
//!     fn restore(&mut self, state: &i32) {
//!         self.0 = *state;
//!     }
//! }
//!
//! let mut counter = Counter(1);
//! let mut tx = Transaction::new(true, &counter, 5, None);
//! counter.0 = 2;
//! tx.commit(&counter);
//! counter.0 = 3;
//! tx.commit(&counter);
//!
//! tx.rollback(1, &mut counter).unwrap();
//! assert_eq!(counter, Counter(2));
//! ```

use std::collections::VecDeque;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{GameError, Result};

/// Something whose state can be captured and put back.
pub trait Memento {
    /// Captured state.
    type State;

    /// Capture the current state. A deep capture includes state a shallow
    /// one leaves out (for the board: the dice).
    fn capture(&self, deep: bool) -> Self::State;

    /// Put a captured state back.
    fn restore(&mut self, state: &Self::State);
}

impl<T: Memento> Memento for [T] {
    type State = Vec<T::State>;

    fn capture(&self, deep: bool) -> Self::State {
        self.iter().map(|item| item.capture(deep)).collect()
    }

    fn restore(&mut self, state: &Self::State) {
        assert_eq!(
            self.len(),
            state.len(),
            "Snapshot holds {} objects, target has {}",
            state.len(),
            self.len()
        );
        for (item, saved) in self.iter_mut().zip(state) {
            item.restore(saved);
        }
    }
}

/// Bounded snapshot history of one target.
pub struct Transaction<T: Memento + ?Sized> {
    id: String,
    deep: bool,
    max_depth: usize,
    snapshots: VecDeque<T::State>,
}

impl<T: Memento + ?Sized> Transaction<T> {
    /// Start a history of `target`, capturing its current state as the
    /// first snapshot. A missing `id` gets a random one.
    pub fn new(deep: bool, target: &T, max_depth: usize, id: Option<String>) -> Self {
        assert!(max_depth >= 1, "Transaction depth must be at least 1");
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut snapshots = VecDeque::with_capacity(max_depth);
        snapshots.push_back(target.capture(deep));
        debug!(transaction = %id, deep, max_depth, "transaction started");
        Self {
            id,
            deep,
            max_depth,
            snapshots,
        }
    }

    /// Transaction id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Are snapshots deep?
    #[must_use]
    pub fn is_deep(&self) -> bool {
        self.deep
    }

    /// Snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: construction takes the first snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum snapshots held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_depth
    }

    /// Append a snapshot of `target`, dropping the oldest when full.
    pub fn commit(&mut self, target: &T) {
        if self.snapshots.len() >= self.max_depth {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(target.capture(self.deep));
        debug!(transaction = %self.id, snapshots = self.snapshots.len(), "committed");
    }

    /// Discard the newest `steps` snapshots and restore `target` from the
    /// newest remaining one.
    ///
    /// Fails with [`GameError::InsufficientHistory`] unless at least one
    /// snapshot would remain; nothing is discarded in that case.
    pub fn rollback(&mut self, steps: usize, target: &mut T) -> Result<()> {
        if steps >= self.snapshots.len() {
            return Err(GameError::InsufficientHistory {
                requested: steps,
                available: self.snapshots.len().saturating_sub(1),
            });
        }
        self.snapshots.truncate(self.snapshots.len() - steps);
        if let Some(state) = self.snapshots.back() {
            target.restore(state);
        }
        info!(transaction = %self.id, steps, snapshots = self.snapshots.len(), "rolled back");
        Ok(())
    }

    /// Steps a rollback can go back at most.
    #[must_use]
    pub fn available_steps(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }
}

impl<T: Memento + ?Sized> std::fmt::Debug for Transaction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("deep", &self.deep)
            .field("max_depth", &self.max_depth)
            .field("snapshots", &self.snapshots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct ForTest {
        value: i32,
        scratch: Vec<i32>,
    }

    impl ForTest {
        fn new(value: i32) -> Self {
            Self { value, scratch: vec![value] }
        }
    }

    impl Memento for ForTest {
        type State = (i32, Option<Vec<i32>>);

        fn capture(&self, deep: bool) -> Self::State {
            (self.value, deep.then(|| self.scratch.clone()))
        }

        fn restore(&mut self, state: &Self::State) {
            self.value = state.0;
            if let Some(scratch) = &state.1 {
                self.scratch = scratch.clone();
            }
        }
    }

    fn values(objects: &[ForTest]) -> Vec<i32> {
        objects.iter().map(|o| o.value).collect()
    }

    #[test]
    fn test_rollback_restores_older_commit() {
        let mut objects = vec![ForTest::new(1), ForTest::new(2)];
        let mut tx: Transaction<[ForTest]> = Transaction::new(true, &objects, 5, None);

        objects[0].value = 10;
        tx.commit(&objects);
        objects[0].value = 20;
        tx.commit(&objects);
        objects[0].value = 30;
        tx.commit(&objects);

        tx.rollback(2, &mut objects).unwrap();
        assert_eq!(values(&objects), vec![10, 2]);
        assert_eq!(tx.len(), 2);

        // The restored snapshot stays in the history.
        objects[1].value = 99;
        tx.rollback(0, &mut objects).unwrap();
        assert_eq!(values(&objects), vec![10, 2]);
    }

    #[test]
    fn test_depth_bound() {
        let mut objects = vec![ForTest::new(0)];
        let mut tx: Transaction<[ForTest]> = Transaction::new(true, &objects, 3, Some("t".into()));
        for value in 1..=5 {
            objects[0].value = value;
            tx.commit(&objects);
        }
        assert_eq!(tx.len(), 3);
        assert_eq!(tx.capacity(), 3);
        assert_eq!(tx.available_steps(), 2);
        assert_eq!(tx.id(), "t");

        tx.rollback(2, &mut objects).unwrap();
        assert_eq!(values(&objects), vec![3]);
    }

    #[test]
    fn test_insufficient_history() {
        let mut objects = vec![ForTest::new(0)];
        let mut tx: Transaction<[ForTest]> = Transaction::new(true, &objects, 3, None);
        objects[0].value = 7;

        let err = tx.rollback(1, &mut objects).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientHistory { requested: 1, available: 0 }
        ));
        // Nothing restored, nothing discarded
        assert_eq!(values(&objects), vec![7]);
        assert_eq!(tx.len(), 1);
    }

    #[test]
    fn test_shallow_skips_deep_state() {
        let mut objects = vec![ForTest::new(1)];
        let mut tx: Transaction<[ForTest]> = Transaction::new(false, &objects, 3, None);
        assert!(!tx.is_deep());

        objects[0].value = 5;
        objects[0].scratch.push(5);
        tx.rollback(0, &mut objects).unwrap();

        assert_eq!(objects[0].value, 1);
        assert_eq!(objects[0].scratch, vec![1, 5]);
    }

    #[test]
    fn test_generated_ids_differ() {
        let objects = vec![ForTest::new(1)];
        let a: Transaction<[ForTest]> = Transaction::new(true, &objects, 2, None);
        let b: Transaction<[ForTest]> = Transaction::new(true, &objects, 2, None);
        assert_ne!(a.id(), b.id());
        assert!(!a.is_empty());
    }

    #[test]
    #[should_panic(expected = "Snapshot holds")]
    fn test_restore_length_mismatch() {
        let objects = vec![ForTest::new(1)];
        let state = objects.capture(true);
        let mut other = vec![ForTest::new(1), ForTest::new(2)];
        other.restore(&state);
    }
}
