//! Infrastructure layer: wire DTOs, the WebSocket message pusher, and the
//! event relay bridging coordinator output to delivery.

pub mod dto;
pub mod message_pusher;
pub mod relay;
