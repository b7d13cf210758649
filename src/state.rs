use crate::rooms::RoomDirectory;
use crate::ws::scope::RoomScopes;
use crate::ws::ConnectionRegistry;

/// Shared application state passed to all handlers and connection actors.
///
/// Every field is a cheap Arc-backed handle. The relay holds no other state;
/// everything here is in-memory and lost on restart by design.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Live connections and their outbound channels
    pub connections: ConnectionRegistry,
    /// Authoritative room membership
    pub rooms: RoomDirectory,
    /// Transport-level room broadcast scopes
    pub scopes: RoomScopes,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
