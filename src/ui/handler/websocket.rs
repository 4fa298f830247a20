//! WebSocket connection handler.
//!
//! One upgraded socket is one transport session: the server assigns it a fresh
//! connection id, registers its outbound channel with the relay, then applies
//! inbound events in the order they arrive on the socket. Socket teardown maps
//! to the disconnect event regardless of how the session ended.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, DisplayName, MessageContent, RoomId, UserId};
use crate::infrastructure::dto::websocket::ClientEvent;
use crate::infrastructure::relay::EventRelay;

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The connection id is transport-assigned; clients never pick their own.
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state.relay.open_connection(connection_id.clone(), tx).await;
    tracing::info!("Connection '{}' established", connection_id);

    // Task that forwards relayed messages to this client's socket
    let mut send_task = pusher_loop(rx, sender);

    // Task that applies this client's inbound events, in order
    let relay = state.relay.clone();
    let event_connection = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", event_connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&relay, &event_connection, text.as_str()).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping from '{}'", event_connection);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", event_connection);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Socket teardown is the disconnect event, whatever ended the session
    state.relay.handle_disconnect(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Spawns a task that receives messages from the rx channel and pushes them to
/// this client's WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Parse one inbound text frame and forward it to the relay.
///
/// Malformed frames and invalid field values are logged and dropped; they
/// never terminate the session.
async fn handle_text(relay: &EventRelay, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Failed to parse event from '{}' as JSON: {}",
                connection_id,
                e
            );
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom { room_id, user_id } => {
            match (RoomId::new(room_id), UserId::new(user_id)) {
                (Ok(room_id), Ok(user_id)) => {
                    relay.handle_join(connection_id, room_id, user_id).await;
                }
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Invalid join-room from '{}': {}", connection_id, e);
                }
            }
        }
        ClientEvent::SendChat { message, sender_id } => {
            if sender_id.is_some() {
                // Legacy clients claim a sender identity; the registry record
                // is authoritative.
                tracing::debug!("Ignoring legacy sender_id from '{}'", connection_id);
            }
            match MessageContent::new(message) {
                Ok(message) => relay.handle_chat(connection_id, message).await,
                Err(e) => tracing::warn!("Invalid send-chat from '{}': {}", connection_id, e),
            }
        }
        ClientEvent::RegisterDisplayName {
            new_display_name, ..
        } => match DisplayName::new(new_display_name) {
            Ok(new_display_name) => {
                relay.handle_rename(connection_id, new_display_name).await;
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid register-display-name from '{}': {}",
                    connection_id,
                    e
                );
            }
        },
    }
}
