//! Todo use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Validate title input before it reaches the repository.
//! - Delegate persistence and broadcasting to the repository.
//!
//! # Invariants
//! - The repository itself imposes no title constraint; validation lives
//!   here, at the entry boundary.
//! - Titles are trimmed before validation and storage.

use crate::model::todo::{validate_title, Todo, TodoPatch};
use crate::repo::feed::TodoUpdates;
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for todo CRUD operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Subscribes to the live collection stream.
    pub fn watch_all(&mut self) -> TodoUpdates {
        self.repo.watch_all()
    }

    /// Returns a point-in-time copy of the current collection.
    pub fn all(&self) -> Vec<Todo> {
        self.repo.all()
    }

    /// Returns the first todo matching `id`.
    pub fn get(&self, id: &str) -> Option<Todo> {
        self.repo.get(id)
    }

    /// Creates a pre-built todo through the repository unchanged.
    pub fn create(&mut self, todo: Todo) -> RepoResult<bool> {
        self.repo.create(todo)
    }

    /// Creates a new open todo from raw title input.
    ///
    /// # Contract
    /// - Trims the title, then validates it (non-blank, at most 100 chars).
    /// - Generates the id and creation timestamp.
    /// - Returns the created record.
    pub fn add_todo(&mut self, title: impl Into<String>) -> RepoResult<Todo> {
        let title = title.into();
        let trimmed = title.trim();
        validate_title(trimmed)?;

        let todo = Todo::new(trimmed);
        self.repo.create(todo.clone())?;
        Ok(todo)
    }

    /// Applies a patch to the todo matching `id`.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update(&mut self, id: &str, patch: &TodoPatch) -> RepoResult<bool> {
        self.repo.update(id, patch)
    }

    /// Sets the completion flag on the todo matching `id`.
    pub fn set_completed(&mut self, id: &str, completed: bool) -> RepoResult<bool> {
        self.repo.update(
            id,
            &TodoPatch {
                completed: Some(completed),
                ..TodoPatch::default()
            },
        )
    }

    /// Replaces the title of the todo matching `id` with validated input.
    pub fn rename(&mut self, id: &str, title: impl Into<String>) -> RepoResult<bool> {
        let title = title.into();
        let trimmed = title.trim();
        validate_title(trimmed)?;

        self.repo.update(
            id,
            &TodoPatch {
                title: Some(trimmed.to_string()),
                ..TodoPatch::default()
            },
        )
    }

    /// Deletes every todo matching `id`.
    pub fn delete(&mut self, id: &str) -> RepoResult<bool> {
        self.repo.delete(id)
    }
}
