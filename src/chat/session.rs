//! Per-connection session context for huddle.

use uuid::Uuid;

use crate::config::SessionConfig;

/// Server-side state for one live connection.
///
/// Populated at connect time from configuration. The sender identity and
/// group travel with the session, never with the wire payload, so a
/// client cannot impersonate another sender. Eventually real
/// authentication fills these fields instead.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Unique ID for this connection.
    pub connection_id: String,
    /// Fixed sender identity for messages submitted on this connection.
    pub user_id: i64,
    /// Group this connection is assigned to.
    pub group_id: i64,
}

impl SessionContext {
    /// Create a context for a newly accepted connection.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            connection_id: format!("ws-{}", Uuid::new_v4()),
            user_id: config.user_id,
            group_id: config.group_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_carries_configured_identity() {
        let config = SessionConfig {
            user_id: 7,
            group_id: 3,
        };
        let session = SessionContext::new(&config);
        assert_eq!(session.user_id, 7);
        assert_eq!(session.group_id, 3);
        assert!(session.connection_id.starts_with("ws-"));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let config = SessionConfig::default();
        let a = SessionContext::new(&config);
        let b = SessionContext::new(&config);
        assert_ne!(a.connection_id, b.connection_id);
    }
}
