//! Shared application state.

use std::sync::Arc;

use crate::infrastructure::relay::EventRelay;
use crate::usecase::MembershipCoordinator;

/// State shared by all handlers.
pub struct AppState {
    /// Event relay: WebSocket sessions feed inbound events through it.
    pub relay: Arc<EventRelay>,
    /// Coordinator, used directly by the read-only HTTP endpoints.
    pub coordinator: Arc<MembershipCoordinator>,
}
