//! Repository layer: persistence adapter, reactive read model and the
//! mutation surface built on both.
//!
//! # Responsibility
//! - Define the data-access contracts used by service/entry layers.
//! - Isolate SQLite and serialization details from business orchestration.
//!
//! # Invariants
//! - After construction, the only error that crosses this layer is
//!   `RepoError::NotFound` from `update`; storage faults are contained and
//!   logged inside the slot store.
//! - Every mutation follows compute, persist, publish ordering.

use crate::db::DbError;
use crate::model::todo::{TodoId, TodoValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod feed;
pub mod slot_store;
pub mod todo_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and lookup operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entry-point title validation failed.
    Validation(TodoValidationError),
    /// Database bootstrap or connection-readiness failure.
    Db(DbError),
    /// `update` target does not exist.
    NotFound(TodoId),
    /// Connection has not been migrated to the supported schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A table required by the slot store is absent.
    MissingRequiredTable(&'static str),
    /// A column required by the slot store is absent.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
