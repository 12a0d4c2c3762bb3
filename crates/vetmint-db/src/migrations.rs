//! Forward-only schema upgrades, tracked in `PRAGMA user_version`.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Upgrade steps in order. Step `n` takes a store from version `n - 1` to `n`.
const STEPS: &[(u32, &str)] = &[(1, schema::SCHEMA_V1)];

/// Bring the store up to [`SCHEMA_VERSION`].
///
/// Each step runs in its own transaction together with its version bump.
/// A store written by a newer build is refused.
pub fn run(conn: &Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "store is at schema v{current}, this build supports up to v{SCHEMA_VERSION}"
        )));
    }

    for &(version, sql) in STEPS.iter().filter(|(version, _)| *version > current) {
        tracing::info!(version, "applying schema step");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }
    Ok(())
}
