//! Per-connection session controller.
//!
//! Binds inbound events to membership and relay calls and tracks which rooms
//! this connection joined, so disconnect cleanup works from explicit session
//! state rather than closure capture.

use crate::membership;
use crate::relay;
use crate::state::AppState;
use crate::ws::protocol::{ClientEvent, ServerEvent};
use crate::ws::ConnectionId;

/// One join performed on this connection. Consulted at disconnect to run
/// leave cleanup for every room the connection entered.
#[derive(Debug, Clone)]
struct JoinedRoom {
    room_id: String,
    user_id: String,
    display_name: String,
}

/// Event sequencer for one connection. The actor's reader loop owns it, so
/// events for a single connection are always processed in order.
pub struct Session {
    connection_id: ConnectionId,
    joined_rooms: Vec<JoinedRoom>,
}

impl Session {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            joined_rooms: Vec::new(),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Dispatch one inbound event.
    pub fn handle_event(&mut self, state: &AppState, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom {
                room_id,
                user_id,
                display_name,
            } => {
                membership::join_room(state, self.connection_id, &room_id, &user_id, &display_name);
                self.joined_rooms.push(JoinedRoom {
                    room_id,
                    user_id,
                    display_name,
                });
            }
            ClientEvent::Signal(envelope) => {
                relay::relay_signal(state, self.connection_id, envelope);
            }
            ClientEvent::ChatMessage {
                room_id,
                message,
                user_name,
            } => {
                relay::broadcast_to_room(
                    state,
                    &room_id,
                    self.connection_id,
                    &ServerEvent::ChatMessage { message, user_name },
                );
            }
            ClientEvent::Typing {
                room_id,
                user_id,
                is_typing,
            } => {
                relay::broadcast_to_room(
                    state,
                    &room_id,
                    self.connection_id,
                    &ServerEvent::Typing { user_id, is_typing },
                );
            }
        }
    }

    /// Disconnect cleanup: leave every room this connection joined, in join
    /// order. A client that joined the same room twice produces two leave
    /// notifications, matching its two join notifications.
    pub fn finish(self, state: &AppState) {
        for joined in &self.joined_rooms {
            tracing::info!(
                connection_id = %self.connection_id,
                room_id = %joined.room_id,
                user_id = %joined.user_id,
                display_name = %joined.display_name,
                "disconnect cleanup"
            );
            membership::leave_room(state, self.connection_id, &joined.room_id, &joined.user_id);
        }
    }
}
