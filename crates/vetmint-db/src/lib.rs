//! # vetmint-db
//!
//! SQLite store behind the vetmint host: one `vetmint.db` file per data
//! directory.
//!
//! The store holds two things. `engine_state` is a single row with the latest
//! engine snapshot as JSON. `notifications` is an append-only journal keyed by
//! sequence number. The host calls [`queries::state::persist`] after every
//! successful mutation, which replaces the row and appends the new journal
//! entries in one transaction, so a crash leaves the last committed pair.
//!
//! Timestamps are unix seconds. The schema version is `PRAGMA user_version`.

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Schema version this build writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Store file name inside the data directory.
pub const DB_FILE_NAME: &str = "vetmint.db";

/// Store error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    /// Snapshot JSON that does not decode.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted data that contradicts itself.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open the snapshot store at `path`, creating and migrating it as needed.
pub fn open(path: &Path) -> Result<Connection> {
    prepare(Connection::open(path)?)
}

/// A throwaway store, used by tests.
pub fn open_memory() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    migrations::run(&conn)?;
    Ok(conn)
}
