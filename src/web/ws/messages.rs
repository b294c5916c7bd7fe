//! WebSocket message types for the real-time channel.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::Message;

/// Messages sent from client to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit a chat message to the session's group.
    ///
    /// Sender and group come from the server-side session context, never
    /// from the payload.
    SendMessage {
        /// Message content.
        content: String,
    },
    /// Heartbeat ping.
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A message accepted into the session's group, fanned out to every
    /// subscriber including the sender. Identical in shape to one element
    /// of the history array.
    ReceiveMessage {
        /// Server-assigned message ID.
        message_id: i64,
        /// Message content.
        content: String,
        /// Server-assigned insertion time.
        timestamp: NaiveDateTime,
        /// Sender identity reference.
        sender_id: i64,
        /// Sender's display name.
        username: String,
        /// Sender's anonymous flag.
        is_anonymous: bool,
    },
    /// Error reply for a malformed frame.
    Error {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
    },
    /// Heartbeat pong response.
    Pong,
}

impl ServerMessage {
    /// Create a broadcast frame from an enriched message.
    pub fn receive(message: Message) -> Self {
        Self::ReceiveMessage {
            message_id: message.message_id,
            content: message.content,
            timestamp: message.timestamp,
            sender_id: message.sender_id,
            username: message.username,
            is_anonymous: message.is_anonymous,
        }
    }

    /// Create an error message.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
