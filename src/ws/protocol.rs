//! JSON wire protocol for the signaling relay.
//!
//! Messages are adjacently tagged text frames: `{"event": "...", "data": ...}`.
//! Signal payloads are opaque to the relay apart from the `to`/`from`
//! addressing fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound events from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        user_id: String,
        display_name: String,
    },
    Signal(SignalEnvelope),
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        room_id: String,
        message: String,
        user_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Typing {
        room_id: String,
        user_id: String,
        is_typing: bool,
    },
}

/// A connection-negotiation envelope. Only `to` is interpreted by the relay;
/// the remainder (type, payload, any client-supplied `from`, ...) passes
/// through untouched except that `from` is overwritten with the sender's
/// connection id on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEnvelope {
    pub to: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Outbound events to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Roster sent to a newly joined connection only.
    ExistingUsers(Vec<RosterEntry>),
    #[serde(rename_all = "camelCase")]
    UserConnected {
        user_id: String,
        display_name: String,
    },
    #[serde(rename_all = "camelCase")]
    UserDisconnected { user_id: String },
    /// Relayed negotiation envelope, `from` rewritten to the sender's
    /// connection id.
    Signal(Map<String, Value>),
    #[serde(rename_all = "camelCase")]
    ChatMessage { message: String, user_name: String },
    #[serde(rename_all = "camelCase")]
    Typing { user_id: String, is_typing: bool },
}

/// One roster entry of the `existing-users` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub user_id: String,
    pub display_name: String,
}
