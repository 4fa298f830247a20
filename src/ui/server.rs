//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::infrastructure::relay::EventRelay;
use crate::usecase::MembershipCoordinator;

use super::{
    handler::{
        http::{get_room_detail, get_rooms, health_check, redirect_to_new_room, room_page},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Signaling relay server.
pub struct Server {
    relay: Arc<EventRelay>,
    coordinator: Arc<MembershipCoordinator>,
}

impl Server {
    pub fn new(relay: Arc<EventRelay>, coordinator: Arc<MembershipCoordinator>) -> Self {
        Self { relay, coordinator }
    }

    /// Run the server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            relay: self.relay,
            coordinator: self.coordinator,
        });

        let app = Router::new()
            // page routing
            .route("/", get(redirect_to_new_room))
            .route("/rooms/{room_id}", get(room_page))
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP API
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Signaling relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
