//! Message model for huddle.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A persisted message enriched with its sender's display metadata.
///
/// This is the shape served by the history endpoint and carried by the
/// real-time broadcast; both surfaces serialize it identically, so a
/// client renders live and historical messages through one code path.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Server-assigned ID, strictly increasing in insertion order.
    pub message_id: i64,
    /// Text payload, stored verbatim.
    pub content: String,
    /// Server-assigned insertion time (UTC). History ordering key, with
    /// `message_id` as the tie-break for equal timestamps.
    pub timestamp: NaiveDateTime,
    /// Sender identity reference.
    pub sender_id: i64,
    /// Sender's display name, joined at read time.
    pub username: String,
    /// Sender's anonymous flag, joined at read time.
    pub is_anonymous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        Message {
            message_id: 1,
            content: "hello".to_string(),
            timestamp: NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            sender_id: 1,
            username: "alice".to_string(),
            is_anonymous: false,
        }
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(sample_message()).unwrap();
        assert_eq!(json["message_id"], 1);
        assert_eq!(json["content"], "hello");
        assert_eq!(json["sender_id"], 1);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["is_anonymous"], false);
        assert!(json["timestamp"].is_string());
    }
}
