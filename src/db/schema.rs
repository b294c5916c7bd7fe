//! Database schema and migrations for huddle.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users and messages tables
    r#"
-- Sender identities. Read-joined by the chat core, written only by
-- seeding (and eventually by a registration flow outside this core).
CREATE TABLE users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL,
    is_anonymous  INTEGER NOT NULL DEFAULT 0
);

-- Append-only message log. Rows are never updated or deleted.
CREATE TABLE messages (
    message_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id   INTEGER NOT NULL REFERENCES users(user_id),
    content     TEXT NOT NULL,
    group_id    INTEGER NOT NULL,
    timestamp   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_messages_group_timestamp ON messages(group_id, timestamp);
"#,
    // v2: Seed the placeholder session user
    r#"
INSERT INTO users (username, is_anonymous) VALUES ('guest', 1);
"#,
];
