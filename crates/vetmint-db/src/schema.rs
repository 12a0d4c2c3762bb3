//! SQL schema definitions.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Engine state
-- ============================================================

CREATE TABLE IF NOT EXISTS engine_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    snapshot TEXT NOT NULL,
    last_sequence INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- ============================================================
-- Notification journal
-- ============================================================

CREATE TABLE IF NOT EXISTS notifications (
    sequence INTEGER PRIMARY KEY,
    event_type TEXT NOT NULL,
    payload TEXT NOT NULL,
    recorded_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_type ON notifications(event_type);
"#;
