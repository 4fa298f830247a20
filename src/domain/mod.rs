//! Domain layer: value objects, the room registry, and the outbound-delivery
//! interface.
//!
//! The registry is a pure in-memory state container with no network awareness.
//! The `MessagePusher` trait is defined here so that the use case layer depends
//! on an interface owned by the domain, not on the WebSocket implementation.

mod error;
mod member;
mod pusher;
mod registry;
mod room;

pub use error::DomainError;
pub use member::{ConnectionId, DisplayName, Member, MessageContent, UserId};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::{RegistryError, RoomRegistry};
pub use room::{Room, RoomId};

#[cfg(test)]
pub use pusher::MockMessagePusher;
