//! Membership manager: the join/leave lifecycle.
//!
//! Orchestrates the room directory, the transport room scopes, and the relay
//! engine for presence notifications. Everything here is synchronous and
//! best-effort; nothing blocks or fails the caller.

use crate::relay;
use crate::rooms::Member;
use crate::state::AppState;
use crate::ws::protocol::{RosterEntry, ServerEvent};
use crate::ws::ConnectionId;

/// Add a connection to a room.
///
/// Subscribes the connection to the room's broadcast scope, records the
/// member, announces the arrival to the rest of the room, and sends the
/// current roster back to the joiner. A join with an already-used user id
/// succeeds and produces a duplicate member record.
pub fn join_room(
    state: &AppState,
    connection_id: ConnectionId,
    room_id: &str,
    user_id: &str,
    display_name: &str,
) {
    // The session controller only dispatches events for registered
    // connections; an absent entry here means the join raced a disconnect.
    if !state.connections.contains(connection_id) {
        tracing::warn!(
            connection_id = %connection_id,
            room_id = %room_id,
            "join from unregistered connection, ignoring"
        );
        return;
    }

    tracing::info!(
        connection_id = %connection_id,
        room_id = %room_id,
        user_id = %user_id,
        display_name = %display_name,
        "joining room"
    );

    state.scopes.subscribe(room_id, connection_id);

    state.rooms.add_member(
        room_id,
        Member {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            connection_id,
        },
    );

    // Notify everyone already in the room, excluding the joiner
    relay::broadcast_to_room(
        state,
        room_id,
        connection_id,
        &ServerEvent::UserConnected {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
        },
    );

    // Send the roster to the joining connection only
    let roster: Vec<RosterEntry> = state
        .rooms
        .members_except(room_id, user_id)
        .into_iter()
        .map(|m| RosterEntry {
            user_id: m.user_id,
            display_name: m.display_name,
        })
        .collect();
    relay::send_to_connection(state, connection_id, &ServerEvent::ExistingUsers(roster));
}

/// Remove a user from a room on leave or disconnect.
///
/// Unsubscribes the connection from the broadcast scope, removes every member
/// record matching the user id (deleting the room if it empties), and
/// notifies the remaining members. No-op for unknown rooms.
pub fn leave_room(state: &AppState, connection_id: ConnectionId, room_id: &str, user_id: &str) {
    state.scopes.unsubscribe(room_id, connection_id);
    state.rooms.remove_user(room_id, user_id);

    relay::broadcast_to_room(
        state,
        room_id,
        connection_id,
        &ServerEvent::UserDisconnected {
            user_id: user_id.to_string(),
        },
    );
}
