//! Signaling relay for peer-to-peer video calls.
//!
//! This library assigns browser clients to rooms, tracks per-room membership
//! with display names, and broadcasts membership/chat events over WebSocket so
//! clients can establish direct media connections with an external
//! peer-connection library. Media transport itself is out of scope.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
