//! Persistent slot store: the whole collection as one serialized payload.
//!
//! # Responsibility
//! - Serialize/deserialize the full todo collection to one named slot.
//! - Contain storage faults: reads degrade to empty, writes are best-effort.
//!
//! # Invariants
//! - `load` never surfaces an error; any fault yields an empty collection.
//! - `save` never surfaces an error; write faults are logged and swallowed,
//!   so callers must not assume durability succeeded.
//! - Construction verifies schema readiness and is the only fallible path.

use crate::db::migrations::latest_version;
use crate::model::todo::Todo;
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, warn};
use rusqlite::{params, Connection};

/// Slot name used when the caller does not pick one.
pub const DEFAULT_SLOT: &str = "todos";

/// Storage contract for the whole-collection payload.
///
/// Both operations are deliberately infallible: the containment boundary
/// for storage faults lives here, not in callers.
pub trait SlotStore {
    /// Reads the slot. A missing slot, an unparsable payload or any
    /// storage fault degrades to an empty collection.
    fn load(&self) -> Vec<Todo>;

    /// Serializes the full collection and overwrites the slot.
    fn save(&self, todos: &[Todo]);
}

/// SQLite-backed slot store over a migrated connection.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
    slot: String,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Constructs a store over [`DEFAULT_SLOT`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_slot(conn, DEFAULT_SLOT)
    }

    /// Constructs a store over a caller-named slot.
    ///
    /// Distinct slot names are fully isolated from each other.
    pub fn with_slot(conn: &'conn Connection, slot: impl Into<String>) -> RepoResult<Self> {
        ensure_slot_connection_ready(conn)?;
        Ok(Self {
            conn,
            slot: slot.into(),
        })
    }

    /// Returns the slot name this store reads and writes.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn read_payload(&self) -> rusqlite::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM slots WHERE name = ?1;")?;
        let mut rows = stmt.query([self.slot.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn write_payload(&self, payload: &str) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO slots (name, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.slot.as_str(), payload],
        )?;
        Ok(())
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn load(&self) -> Vec<Todo> {
        let payload = match self.read_payload() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(
                    "event=slot_load module=repo status=ok slot={} count=0 reason=slot_absent",
                    self.slot
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=repo status=degraded slot={} reason=read_failed error={err}",
                    self.slot
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Todo>>(&payload) {
            Ok(todos) => {
                debug!(
                    "event=slot_load module=repo status=ok slot={} count={}",
                    self.slot,
                    todos.len()
                );
                todos
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=repo status=degraded slot={} reason=parse_failed error={err}",
                    self.slot
                );
                Vec::new()
            }
        }
    }

    fn save(&self, todos: &[Todo]) {
        let payload = match serde_json::to_string(todos) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=slot_save module=repo status=error slot={} reason=serialize_failed error={err}",
                    self.slot
                );
                return;
            }
        };

        if let Err(err) = self.write_payload(&payload) {
            error!(
                "event=slot_save module=repo status=error slot={} reason=write_failed error={err}",
                self.slot
            );
            return;
        }

        debug!(
            "event=slot_save module=repo status=ok slot={} count={}",
            self.slot,
            todos.len()
        );
    }
}

fn ensure_slot_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "slots")? {
        return Err(RepoError::MissingRequiredTable("slots"));
    }

    for column in ["name", "payload", "updated_at"] {
        if !table_has_column(conn, "slots", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "slots",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
