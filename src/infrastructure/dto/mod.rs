//! Data transfer objects for the wire boundaries.
//!
//! - `websocket`: JSON events exchanged with browser clients
//! - `http`: JSON bodies of the HTTP API

pub mod http;
pub mod websocket;
