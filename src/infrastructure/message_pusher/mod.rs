//! Concrete implementations of the domain's `MessagePusher` trait.

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
