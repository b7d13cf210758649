//! Relay engine: fire-and-forget message delivery.
//!
//! Three primitives: directed signal relay, room broadcast, and directed
//! event delivery. None of them block, acknowledge, or retry; an unreachable
//! destination degrades to drop-and-log.

use axum::extract::ws::Message;
use serde_json::Value;
use thiserror::Error;

use crate::state::AppState;
use crate::ws::protocol::{ServerEvent, SignalEnvelope};
use crate::ws::ConnectionId;

/// Delivery failures. Never surfaced to the sending client; callers log at
/// debug and drop the message.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Destination is not a parseable connection id
    #[error("invalid destination connection id: {0}")]
    InvalidDestination(String),

    /// Destination connection is not in the registry
    #[error("unknown destination connection")]
    UnknownDestination,

    /// Destination channel closed mid-send
    #[error("destination channel closed")]
    ChannelClosed,

    /// Outbound event failed to encode
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Relay a signaling envelope to the connection it addresses.
///
/// The envelope is delivered verbatim except that `from` is overwritten with
/// the sender's own connection id, so receivers can trust the origin. An
/// unknown or invalid destination drops the message silently: retry and
/// timeout belong to the client-side negotiation protocol.
pub fn relay_signal(state: &AppState, sender: ConnectionId, envelope: SignalEnvelope) {
    if let Err(e) = try_relay_signal(state, sender, envelope) {
        tracing::debug!(connection_id = %sender, error = %e, "signal dropped");
    }
}

fn try_relay_signal(
    state: &AppState,
    sender: ConnectionId,
    envelope: SignalEnvelope,
) -> Result<(), RelayError> {
    let to: ConnectionId = envelope
        .to
        .parse()
        .map_err(|_| RelayError::InvalidDestination(envelope.to.clone()))?;
    let tx = state
        .connections
        .sender_of(to)
        .ok_or(RelayError::UnknownDestination)?;

    let mut out = envelope.rest;
    out.insert("to".to_string(), Value::String(envelope.to));
    out.insert("from".to_string(), Value::String(sender.to_string()));

    let message = encode(&ServerEvent::Signal(out))?;
    tx.send(message).map_err(|_| RelayError::ChannelClosed)?;

    tracing::debug!(from = %sender, to = %to, "signal relayed");
    Ok(())
}

/// Deliver an event to every connection subscribed to the room's scope except
/// the sender. The event is encoded once and fanned out; delivery follows
/// scope subscription, not the room directory.
pub fn broadcast_to_room(state: &AppState, room_id: &str, sender: ConnectionId, event: &ServerEvent) {
    match encode(event) {
        Ok(message) => {
            state
                .scopes
                .broadcast_except(&state.connections, room_id, sender, message);
        }
        Err(e) => {
            tracing::warn!(room_id = %room_id, error = %e, "failed to encode broadcast event");
        }
    }
}

/// Deliver a single event to exactly one connection. Dropped silently if the
/// connection is gone.
pub fn send_to_connection(state: &AppState, id: ConnectionId, event: &ServerEvent) {
    let message = match encode(event) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(connection_id = %id, error = %e, "failed to encode directed event");
            return;
        }
    };

    if let Some(tx) = state.connections.sender_of(id) {
        let _ = tx.send(message);
    }
}

fn encode(event: &ServerEvent) -> Result<Message, serde_json::Error> {
    Ok(Message::Text(serde_json::to_string(event)?.into()))
}
