//! v001 -- Initial schema creation.
//!
//! Creates the singleton `profile` table.  Set-valued fields and the
//! activity log are stored as JSON text columns; the `slot` check constraint
//! keeps the table at exactly one row.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Profile (singleton)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profile (
    slot          INTEGER PRIMARY KEY CHECK (slot = 0),
    id            TEXT NOT NULL,                -- opaque stable user id
    name          TEXT NOT NULL,
    groups        TEXT NOT NULL DEFAULT '[]',   -- JSON array of group codes
    groups_posted TEXT NOT NULL DEFAULT '[]',   -- JSON array of group codes
    total_posts   INTEGER NOT NULL DEFAULT 0,
    activity_log  TEXT NOT NULL DEFAULT '[]',   -- JSON array, capped in code
    updated_at    TEXT NOT NULL                 -- ISO-8601 / RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
