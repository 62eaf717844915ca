//! Reactive read model for the todo collection.
//!
//! # Responsibility
//! - Own the canonical in-memory snapshot.
//! - Broadcast every replacement snapshot to registered subscribers.
//!
//! # Invariants
//! - A new subscriber always receives the current snapshot first
//!   (replay-latest, then live).
//! - Publishing delivers to live subscribers in subscription order and
//!   prunes subscribers whose receiving half was dropped.

use crate::model::todo::Todo;
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Canonical snapshot holder plus an explicit subscriber registry.
///
/// There is no ambient singleton: the feed is owned by one repository
/// instance and handed around by reference.
pub struct TodoFeed {
    snapshot: Vec<Todo>,
    subscribers: Vec<Sender<Vec<Todo>>>,
}

impl TodoFeed {
    /// Creates a feed seeded with the initial collection.
    pub fn new(initial: Vec<Todo>) -> Self {
        Self {
            snapshot: initial,
            subscribers: Vec::new(),
        }
    }

    /// Returns a borrowed view of the current snapshot.
    pub fn current(&self) -> &[Todo] {
        &self.snapshot
    }

    /// Returns an owned copy of the current snapshot.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.snapshot.clone()
    }

    /// Registers a subscriber and immediately replays the current snapshot
    /// into it.
    ///
    /// The subscription lives until the returned [`TodoUpdates`] is dropped.
    pub fn subscribe(&mut self) -> TodoUpdates {
        let (sender, receiver) = channel();
        // The send cannot fail here: the receiving half is still in scope.
        let _ = sender.send(self.snapshot.clone());
        self.subscribers.push(sender);
        debug!(
            "event=feed_subscribe module=repo status=ok subscribers={}",
            self.subscribers.len()
        );
        TodoUpdates { receiver }
    }

    /// Replaces the snapshot and delivers it to every live subscriber in
    /// subscription order.
    pub fn publish(&mut self, next: Vec<Todo>) {
        self.snapshot = next;
        let snapshot = &self.snapshot;
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        debug!(
            "event=feed_publish module=repo status=ok count={} subscribers={}",
            self.snapshot.len(),
            self.subscribers.len()
        );
    }

    /// Returns how many subscriptions were live as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving half of one feed subscription.
///
/// Emissions queue up until drained; dropping this handle ends the
/// subscription at the next publish.
pub struct TodoUpdates {
    receiver: Receiver<Vec<Todo>>,
}

impl TodoUpdates {
    /// Pops the next pending snapshot without blocking.
    ///
    /// Returns `None` once every pending emission has been drained.
    pub fn next_emission(&self) -> Option<Vec<Todo>> {
        self.receiver.try_recv().ok()
    }

    /// Drains pending emissions and returns the most recent one.
    ///
    /// Returns `None` when nothing was pending since the last drain.
    pub fn latest(&self) -> Option<Vec<Todo>> {
        let mut latest = None;
        while let Ok(snapshot) = self.receiver.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }
}
