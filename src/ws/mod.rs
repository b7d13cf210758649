pub mod actor;
pub mod handler;
pub mod protocol;
pub mod scope;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque identifier for one WebSocket connection, assigned at accept time.
/// Unique for the lifetime of the physical link; appears on the wire as the
/// canonical UUID string (the `from` field of relayed signals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Type alias for the sender half of a WebSocket connection's channel.
/// Other parts of the system can clone this to push messages to a specific
/// client without blocking.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// Connection registry: maps each live connection to its outbound channel.
/// Everything else looks connections up through this; an absent entry means
/// the peer already disconnected and the message is dropped.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<DashMap<ConnectionId, ConnectionSender>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the channel for a new connection. A duplicate id silently
    /// replaces the previous channel; the transport never reuses ids.
    pub fn register(&self, id: ConnectionId, sender: ConnectionSender) {
        self.inner.insert(id, sender);
        tracing::debug!(
            connection_id = %id,
            connections = self.inner.len(),
            "connection registered"
        );
    }

    /// Remove the mapping. No-op when the id is absent.
    pub fn unregister(&self, id: ConnectionId) {
        self.inner.remove(&id);
        tracing::debug!(
            connection_id = %id,
            connections = self.inner.len(),
            "connection unregistered"
        );
    }

    /// Look up the outbound channel for a connection.
    pub fn sender_of(&self, id: ConnectionId) -> Option<ConnectionSender> {
        self.inner.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.inner.contains_key(&id)
    }
}
