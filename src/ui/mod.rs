//! UI layer: Axum router, WebSocket and HTTP handlers, graceful shutdown.

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
pub use state::AppState;
