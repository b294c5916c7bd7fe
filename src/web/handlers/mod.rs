//! API handlers for the huddle web surface.

pub mod messages;

pub use messages::*;

use std::sync::Arc;

use crate::chat::GroupBroadcaster;
use crate::config::SessionConfig;
use crate::db::Database;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (cloneable pool wrapper).
    pub db: Database,
    /// Fan-out registry for live connections.
    pub broadcaster: Arc<GroupBroadcaster>,
    /// Placeholder identity assigned to new sessions.
    pub session: SessionConfig,
}

impl AppState {
    /// Create application state around an open database.
    pub fn new(db: Database, session: SessionConfig) -> Self {
        Self {
            db,
            broadcaster: Arc::new(GroupBroadcaster::new()),
            session,
        }
    }
}
