//! Real-time signaling relay for WebRTC-style peer-to-peer connection
//! establishment: room membership, directed signal relay, and presence /
//! chat / typing fan-out over WebSockets.
//!
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod config;
pub mod membership;
pub mod relay;
pub mod rooms;
pub mod routes;
pub mod session;
pub mod state;
pub mod ws;
