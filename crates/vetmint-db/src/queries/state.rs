//! Engine snapshot query functions.

use rusqlite::{Connection, OptionalExtension};
use vetmint_engine::EngineSnapshot;
use vetmint_types::Event;

use crate::queries::notifications;
use crate::{DbError, Result};

/// Load the stored snapshot, if any.
pub fn load(conn: &Connection) -> Result<Option<EngineSnapshot>> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT snapshot, last_sequence FROM engine_state WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((json, last_sequence)) = row else {
        return Ok(None);
    };
    let snapshot: EngineSnapshot = serde_json::from_str(&json)?;
    if snapshot.last_sequence != last_sequence as u64 {
        return Err(DbError::Corrupt(format!(
            "snapshot sequence {} does not match row sequence {last_sequence}",
            snapshot.last_sequence
        )));
    }
    Ok(Some(snapshot))
}

/// Replace the stored snapshot.
pub fn save(conn: &Connection, snapshot: &EngineSnapshot, updated_at: u64) -> Result<()> {
    let json = serde_json::to_string(snapshot)?;
    conn.execute(
        "INSERT OR REPLACE INTO engine_state (id, snapshot, last_sequence, updated_at)
         VALUES (1, ?1, ?2, ?3)",
        rusqlite::params![json, snapshot.last_sequence as i64, updated_at as i64],
    )?;
    Ok(())
}

/// Store a snapshot together with the events drained since the previous
/// one, in a single transaction.
pub fn persist(
    conn: &mut Connection,
    snapshot: &EngineSnapshot,
    events: &[Event],
    now: u64,
) -> Result<()> {
    let tx = conn.transaction()?;
    for event in events {
        notifications::append(&tx, event, now)?;
    }
    save(&tx, snapshot, now)?;
    tx.commit()?;
    tracing::debug!(
        last_sequence = snapshot.last_sequence,
        events = events.len(),
        "state persisted"
    );
    Ok(())
}
