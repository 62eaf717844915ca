//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its partial-update patch.
//! - Provide title validation for entry-point callers.
//!
//! # Invariants
//! - `id` is opaque and stable; the store assumes uniqueness but does not
//!   enforce it.
//! - `created_at_ms` is set once at creation and is not patchable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Maximum accepted title length in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 100;

/// Opaque identifier for one todo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Callers may assign their own ids; `Todo::new` generates a UUID string.
pub type TodoId = String;

/// Title validation failures surfaced by entry-point callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title exceeds [`TITLE_MAX_CHARS`] characters.
    TitleTooLong { chars: usize },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "todo title cannot be empty"),
            Self::TitleTooLong { chars } => write!(
                f,
                "todo title has {chars} characters; maximum is {TITLE_MAX_CHARS}"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable opaque id used for lookup, update and delete.
    pub id: TodoId,
    /// Free text. Entry points validate length; the store does not.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation time in Unix epoch milliseconds. Immutable by convention.
    pub created_at_ms: i64,
}

impl Todo {
    /// Creates a new open todo with a generated UUID id stamped with the
    /// current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Creates a new open todo with a caller-assigned id.
    ///
    /// Used where identity already exists externally. The store never
    /// checks the id for uniqueness; duplicate ids make `update`/`delete`
    /// act on first/all matches respectively.
    pub fn with_id(id: impl Into<TodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            created_at_ms: now_epoch_ms(),
        }
    }

    /// Checks the title against the entry-point contract
    /// (non-blank, at most [`TITLE_MAX_CHARS`] characters).
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)
    }

    /// Marks this todo as completed.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Clears the completion flag.
    pub fn reopen(&mut self) {
        self.completed = false;
    }

    /// Returns whether this todo still needs doing.
    pub fn is_open(&self) -> bool {
        !self.completed
    }
}

/// Partial update applied field-by-field over an existing record.
///
/// Identity (`id`) and creation time are deliberately absent: an update
/// payload cannot change which record it addresses or when it was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Replacement title, when present.
    pub title: Option<String>,
    /// Replacement completion flag, when present.
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Merges this patch over `existing`, returning the patched record.
    pub fn apply_to(&self, existing: &Todo) -> Todo {
        Todo {
            id: existing.id.clone(),
            title: self.title.clone().unwrap_or_else(|| existing.title.clone()),
            completed: self.completed.unwrap_or(existing.completed),
            created_at_ms: existing.created_at_ms,
        }
    }
}

/// Validates one title value against the entry-point contract.
pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }

    let chars = trimmed.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(TodoValidationError::TitleTooLong { chars });
    }

    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
