//! Todo repository contracts and the slot-backed implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface over the canonical collection.
//! - Keep every mutation on the compute, persist, publish path.
//!
//! # Invariants
//! - `update` is the only operation that surfaces `NotFound`.
//! - `create` and `delete` report success once the snapshot is published,
//!   regardless of write durability.
//! - Lookup by id returns the first match; duplicate ids are the caller's
//!   responsibility.

use crate::model::todo::{Todo, TodoPatch};
use crate::repo::feed::{TodoFeed, TodoUpdates};
use crate::repo::slot_store::SlotStore;
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    /// Subscribes to the live collection stream (replay-latest, then live).
    fn watch_all(&mut self) -> TodoUpdates;

    /// Returns a point-in-time copy of the current collection.
    fn all(&self) -> Vec<Todo>;

    /// Returns the first todo whose id equals `id`.
    ///
    /// An empty `id` never matches.
    fn get(&self, id: &str) -> Option<Todo>;

    /// Appends one todo, persists and publishes the new collection.
    ///
    /// Always reports `Ok(true)`; a failed storage write is contained in
    /// the slot store.
    fn create(&mut self, todo: Todo) -> RepoResult<bool>;

    /// Merges `patch` over the first todo matching `id`, persists and
    /// publishes.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no todo matches `id`; the collection is
    ///   left untouched.
    fn update(&mut self, id: &str, patch: &TodoPatch) -> RepoResult<bool>;

    /// Removes every todo matching `id`, persists and publishes.
    ///
    /// Reports `Ok(true)` even when nothing matched; removal is idempotent.
    fn delete(&mut self, id: &str) -> RepoResult<bool>;
}

/// Slot-backed repository owning the reactive read model.
///
/// Loads its snapshot once at construction. Independent instances over the
/// same slot do not share in-memory state and diverge after construction;
/// the design targets a single active instance per process.
pub struct LocalTodoRepository<S: SlotStore> {
    store: S,
    feed: TodoFeed,
}

impl<S: SlotStore> LocalTodoRepository<S> {
    /// Constructs a repository seeded from the store's current payload.
    pub fn new(store: S) -> Self {
        let initial = store.load();
        debug!(
            "event=repo_init module=repo status=ok count={}",
            initial.len()
        );
        Self {
            feed: TodoFeed::new(initial),
            store,
        }
    }

    /// Returns how many feed subscriptions are currently live.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }
}

impl<S: SlotStore> TodoRepository for LocalTodoRepository<S> {
    fn watch_all(&mut self) -> TodoUpdates {
        self.feed.subscribe()
    }

    fn all(&self) -> Vec<Todo> {
        self.feed.snapshot()
    }

    fn get(&self, id: &str) -> Option<Todo> {
        if id.is_empty() {
            return None;
        }
        self.feed
            .current()
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
    }

    fn create(&mut self, todo: Todo) -> RepoResult<bool> {
        let id = todo.id.clone();
        let mut next = self.feed.snapshot();
        next.push(todo);

        self.store.save(&next);
        self.feed.publish(next);

        debug!("event=todo_create module=repo status=ok id={id}");
        Ok(true)
    }

    fn update(&mut self, id: &str, patch: &TodoPatch) -> RepoResult<bool> {
        let mut next = self.feed.snapshot();
        let position = match next.iter().position(|todo| todo.id == id) {
            Some(position) => position,
            None => {
                warn!("event=todo_update module=repo status=error error_code=not_found id={id}");
                return Err(RepoError::NotFound(id.to_string()));
            }
        };

        next[position] = patch.apply_to(&next[position]);

        self.store.save(&next);
        self.feed.publish(next);

        debug!("event=todo_update module=repo status=ok id={id}");
        Ok(true)
    }

    fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let mut next = self.feed.snapshot();
        let before = next.len();
        next.retain(|todo| todo.id != id);
        let removed = before - next.len();

        self.store.save(&next);
        self.feed.publish(next);

        debug!("event=todo_delete module=repo status=ok id={id} removed={removed}");
        Ok(true)
    }
}
