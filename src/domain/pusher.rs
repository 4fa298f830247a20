//! Outbound message delivery interface.
//!
//! The domain defines the interface it needs for pushing messages to connected
//! clients; the infrastructure layer provides the WebSocket implementation.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::member::ConnectionId;

/// Channel used to hand outbound text frames to a connection's writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Delivery of serialized events to connected sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a session's sender channel under its connection id.
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop a session's sender channel. Idempotent.
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Send `content` to a single connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Send `content` to every target, fire-and-forget per recipient: a
    /// failure to deliver to one connection must not prevent delivery to the
    /// others, and is never surfaced to the caller as an error.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}
