//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `users` and `feedbacks`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,               -- argon2 PHC string
    gender        TEXT NOT NULL DEFAULT '',
    is_admin      INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    image         TEXT                         -- nullable profile image URL
);

-- ----------------------------------------------------------------
-- Feedbacks
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS feedbacks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    heading      TEXT NOT NULL,
    category     TEXT NOT NULL,
    subcategory  TEXT NOT NULL,
    message      TEXT NOT NULL,
    submitted_at TEXT NOT NULL,                -- ISO-8601 / RFC-3339, server clock
    user_id      INTEGER NOT NULL,             -- FK -> users(id)
    image        TEXT,                         -- nullable attached image URL

    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_feedbacks_user_ts
    ON feedbacks(user_id, submitted_at DESC);

CREATE INDEX IF NOT EXISTS idx_feedbacks_ts
    ON feedbacks(submitted_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
