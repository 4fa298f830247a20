//! WebSocket-backed `MessagePusher` implementation.
//!
//! Holds the `UnboundedSender` half of each connection's outbound channel,
//! keyed by connection id. The channels themselves are created by the UI layer
//! on WebSocket upgrade; this type only manages registration and delivery.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// Delivery of serialized events over per-connection channels.
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered with pusher", connection_id);
        connections.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        if connections.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from pusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.clone()))?;

        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let connections = self.connections.lock().await;

        for target in targets {
            match connections.get(&target) {
                Some(sender) => {
                    // Partial failure is tolerated: a closed session must not
                    // block delivery to the remaining recipients.
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push to connection '{}': {}", target, e);
                    } else {
                        tracing::debug!("Broadcasted message to connection '{}'", target);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }
    }
}
