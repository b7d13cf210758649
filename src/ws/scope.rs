//! Transport-level room scopes: which connections are subscribed to which
//! room's broadcast set.
//!
//! Kept separate from the room directory on purpose: broadcast delivery
//! follows scope subscription, so a connection stays reachable until the
//! transport unsubscribes it even if directory bookkeeping momentarily
//! diverges during teardown.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;

use crate::ws::{ConnectionId, ConnectionRegistry};

#[derive(Debug, Clone, Default)]
pub struct RoomScopes {
    rooms: Arc<DashMap<String, HashSet<ConnectionId>>>,
}

impl RoomScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a room's broadcast scope.
    pub fn subscribe(&self, room_id: &str, id: ConnectionId) {
        self.rooms.entry(room_id.to_string()).or_default().insert(id);
    }

    /// Unsubscribe a connection from a room's scope, dropping the scope
    /// entirely once it empties. No-op when either is absent.
    pub fn unsubscribe(&self, room_id: &str, id: ConnectionId) {
        if let Some(mut subscribers) = self.rooms.get_mut(room_id) {
            subscribers.remove(&id);
            let empty = subscribers.is_empty();
            drop(subscribers);
            if empty {
                // Re-checks emptiness under the map lock so a concurrent
                // subscribe is never lost.
                self.rooms.remove_if(room_id, |_, subs| subs.is_empty());
            }
        }
    }

    /// Deliver an already-encoded message to every subscriber of a room
    /// except the sender. Best-effort: closed or missing channels are
    /// skipped.
    pub fn broadcast_except(
        &self,
        registry: &ConnectionRegistry,
        room_id: &str,
        sender: ConnectionId,
        message: Message,
    ) {
        let subscribers: Vec<ConnectionId> = match self.rooms.get(room_id) {
            Some(subs) => subs.iter().copied().collect(),
            None => return,
        };

        for id in subscribers {
            if id == sender {
                continue;
            }
            if let Some(tx) = registry.sender_of(id) {
                let _ = tx.send(message.clone());
            }
        }
    }

    pub fn is_subscribed(&self, room_id: &str, id: ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|subs| subs.contains(&id))
    }
}
