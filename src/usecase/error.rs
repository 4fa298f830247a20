//! Coordinator errors.
//!
//! All of these are handled locally by the relay (logged, event dropped); none
//! propagate as transport-level failures. The only user-visible failure is the
//! `error-message` event for a taken display name, which the coordinator
//! returns as a regular sender-only notification, not as an error.

use thiserror::Error;

use crate::domain::ConnectionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// The event arrived outside its valid connection-state window, e.g. a
    /// second `join-room` or an event racing connection teardown.
    #[error("event '{event}' from connection '{connection}' is not valid in its current state")]
    InvalidState {
        connection: ConnectionId,
        event: &'static str,
    },

    /// Chat or rename from a connection that is not currently joined.
    #[error("connection '{0}' is not in a room")]
    NotInRoom(ConnectionId),

    /// Transport invariant violated: the connection id is already a member
    /// somewhere. Integration defect, not a user error.
    #[error("connection '{0}' is already a member of a room")]
    DuplicateConnection(ConnectionId),
}
