//! Message repository for huddle.
//!
//! Append-only storage for chat messages, with sender enrichment applied
//! at read time.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use super::message::Message;
use crate::{HuddleError, Result};

/// Row shape of the message/user join.
///
/// The sender columns are optional so that an orphaned message surfaces as
/// an integrity failure instead of a decode error.
#[derive(sqlx::FromRow)]
struct MessageRow {
    message_id: i64,
    content: String,
    timestamp: NaiveDateTime,
    sender_id: i64,
    username: Option<String>,
    is_anonymous: Option<bool>,
}

impl MessageRow {
    /// Enrichment requires the sender row to exist. A message whose sender
    /// cannot be found fails the containing read; it is never silently
    /// dropped or returned half-filled.
    fn into_enriched(self) -> Result<Message> {
        match (self.username, self.is_anonymous) {
            (Some(username), Some(is_anonymous)) => Ok(Message {
                message_id: self.message_id,
                content: self.content,
                timestamp: self.timestamp,
                sender_id: self.sender_id,
                username,
                is_anonymous,
            }),
            _ => Err(HuddleError::Integrity(format!(
                "message {} references missing sender {}",
                self.message_id, self.sender_id
            ))),
        }
    }
}

/// Repository for message persistence and history reads.
pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new MessageRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all messages for a group, oldest first.
    ///
    /// Ordering is by timestamp with message ID as a stable tie-break.
    /// An unknown group yields an empty list, not an error.
    pub async fn list_for_group(&self, group_id: i64) -> Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT m.message_id, m.content, m.timestamp, m.sender_id,
                    u.username, u.is_anonymous
             FROM messages m
             LEFT JOIN users u ON m.sender_id = u.user_id
             WHERE m.group_id = ?
             ORDER BY m.timestamp ASC, m.message_id ASC",
        )
        .bind(group_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| HuddleError::Storage(e.to_string()))?;

        rows.into_iter().map(MessageRow::into_enriched).collect()
    }

    /// Persist a new message and return it enriched with sender metadata.
    ///
    /// The record is re-read with the join applied inside the same
    /// transaction, so the caller never has to fetch sender details
    /// separately. Either the row is fully persisted and returned, or
    /// nothing is: an enrichment failure rolls the insert back.
    pub async fn save(&self, sender_id: i64, content: &str, group_id: i64) -> Result<Message> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HuddleError::Storage(e.to_string()))?;

        let result =
            sqlx::query("INSERT INTO messages (sender_id, content, group_id) VALUES (?, ?, ?)")
                .bind(sender_id)
                .bind(content)
                .bind(group_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| HuddleError::Storage(e.to_string()))?;

        let id = result.last_insert_rowid();

        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT m.message_id, m.content, m.timestamp, m.sender_id,
                    u.username, u.is_anonymous
             FROM messages m
             LEFT JOIN users u ON m.sender_id = u.user_id
             WHERE m.message_id = ?",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| HuddleError::Storage(e.to_string()))?;

        // Dropping the transaction on the error path rolls the insert back.
        let message = row.into_enriched()?;

        tx.commit()
            .await
            .map_err(|e| HuddleError::Storage(e.to_string()))?;

        Ok(message)
    }
}
