//! Group fan-out for huddle.
//!
//! Routes each enriched message to every live connection subscribed to
//! its group. Subscriptions are in-memory only: on restart they are lost
//! and clients must reconnect.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::Message;

/// Fan-out registry shared by all connections.
///
/// Delivery is best-effort per subscriber: a send into a closed
/// connection is skipped and logged, and never affects the other
/// subscribers or the publisher.
pub struct GroupBroadcaster {
    /// Live subscriptions: group ID -> connection ID -> delivery channel.
    groups: RwLock<HashMap<i64, HashMap<String, UnboundedSender<Message>>>>,
}

impl GroupBroadcaster {
    /// Create a new broadcaster with no subscriptions.
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a connection to a group.
    ///
    /// Returns the receiver the connection drains for broadcast messages.
    /// Subscribing an already-subscribed connection replaces its delivery
    /// channel; the membership set is unchanged.
    pub async fn subscribe(&self, connection_id: &str, group_id: i64) -> UnboundedReceiver<Message> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut groups = self.groups.write().await;
        groups
            .entry(group_id)
            .or_default()
            .insert(connection_id.to_string(), sender);

        receiver
    }

    /// Remove a connection from every group it is subscribed to.
    ///
    /// Called on disconnect. Unsubscribing an unknown connection is a
    /// no-op.
    pub async fn unsubscribe(&self, connection_id: &str) {
        let mut groups = self.groups.write().await;
        for subscribers in groups.values_mut() {
            subscribers.remove(connection_id);
        }
        groups.retain(|_, subscribers| !subscribers.is_empty());
    }

    /// Deliver a message to every current subscriber of a group.
    ///
    /// The originating connection receives its own message back: clients
    /// rely on the echo to render what they sent, there is no separate
    /// local-render path. Each delivery is a non-blocking channel send,
    /// so one dead subscriber cannot stall the rest.
    ///
    /// Returns the number of subscribers the message was handed to.
    pub async fn publish(&self, group_id: i64, message: &Message) -> usize {
        let groups = self.groups.read().await;
        let Some(subscribers) = groups.get(&group_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (connection_id, sender) in subscribers {
            if sender.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Skipping broadcast to closed connection {}", connection_id);
            }
        }
        delivered
    }

    /// Number of live subscribers for a group.
    pub async fn subscriber_count(&self, group_id: i64) -> usize {
        self.groups
            .read()
            .await
            .get(&group_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for GroupBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
