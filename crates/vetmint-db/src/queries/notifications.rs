//! Notification journal query functions.

use rusqlite::Connection;
use vetmint_types::{Event, Notification};

use crate::{DbError, Result};

/// Append one event to the journal.
pub fn append(conn: &Connection, event: &Event, recorded_at: u64) -> Result<()> {
    let payload = serde_json::to_string(&event.notification)?;
    conn.execute(
        "INSERT INTO notifications (sequence, event_type, payload, recorded_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            event.sequence as i64,
            event.notification.event_type().as_str(),
            payload,
            recorded_at as i64,
        ],
    )?;
    Ok(())
}

/// Events with a sequence number above `after`, oldest first.
pub fn list_since(conn: &Connection, after: u64, limit: u32) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT sequence, payload FROM notifications
         WHERE sequence > ?1 ORDER BY sequence ASC LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![after as i64, limit], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(sequence, payload)| {
            let notification: Notification = serde_json::from_str(&payload)?;
            Ok(Event {
                sequence,
                notification,
            })
        })
        .collect()
}

/// Highest journaled sequence number, 0 when empty.
pub fn last_sequence(conn: &Connection) -> Result<u64> {
    let last: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(sequence), 0) FROM notifications",
            [],
            |row| row.get(0),
        )
        .map_err(DbError::Sqlite)?;
    Ok(last as u64)
}

/// Number of journaled events of one type.
pub fn count_by_type(conn: &Connection, event_type: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE event_type = ?1",
        [event_type],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
