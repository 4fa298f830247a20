//! Membership coordinator.
//!
//! Applies join/chat/rename/disconnect events to the room registry and
//! computes the notifications each operation must emit. A per-connection state
//! machine (`Unjoined → Joined`, with disconnection as the terminal
//! transition that removes the entry) is consulted before acting on any
//! inbound event, so events racing connection teardown are dropped instead of
//! mutating state.
//!
//! Registry and connection states live behind a single tokio mutex: the
//! display-name uniqueness check and the rename itself are evaluated under one
//! lock scope, so two concurrent renames to the same name can never both
//! succeed, and all mutations of a room are serialized.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::common::time::get_jst_timestamp;
use crate::domain::{
    ConnectionId, DisplayName, MessageContent, RegistryError, Room, RoomId, RoomRegistry, UserId,
};

use super::error::CoordinatorError;
use super::notification::{Audience, Notification, OutboundEvent};

/// Lifecycle of a single transport session.
///
/// Disconnection is terminal and represented by removing the entry: the map
/// must only hold live sessions, or it would grow by one entry per visit for
/// the life of the process. Events from an absent connection are rejected the
/// same way as from one in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConnectionState {
    /// Session open, no `join-room` received yet.
    Unjoined,
    /// Member of the given room.
    Joined(RoomId),
}

#[derive(Debug, Default)]
struct CoordinatorState {
    registry: RoomRegistry,
    connections: HashMap<ConnectionId, ConnectionState>,
}

/// Applies membership operations and computes outbound notifications.
///
/// Created once at server start and shared (via `Arc`) between the WebSocket
/// relay and the HTTP read endpoints.
#[derive(Debug, Default)]
pub struct MembershipCoordinator {
    state: Mutex<CoordinatorState>,
}

impl MembershipCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened transport session as `Unjoined`.
    pub async fn register_connection(&self, connection_id: ConnectionId) {
        let mut state = self.state.lock().await;
        state
            .connections
            .entry(connection_id)
            .or_insert(ConnectionState::Unjoined);
    }

    /// Join `connection_id` to `room_id` as `user_id`.
    ///
    /// The room is created implicitly if absent and the display name defaults
    /// to the user id. Emits `user-connected` to the rest of the room.
    pub async fn join(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> Result<Notification, CoordinatorError> {
        let mut state = self.state.lock().await;

        match state.connections.get(&connection_id) {
            Some(ConnectionState::Unjoined) => {}
            _ => {
                return Err(CoordinatorError::InvalidState {
                    connection: connection_id,
                    event: "join-room",
                });
            }
        }

        let member = state
            .registry
            .add_member(
                room_id.clone(),
                connection_id.clone(),
                user_id,
                get_jst_timestamp(),
            )
            .map_err(|e| match e {
                RegistryError::DuplicateConnection(id) => CoordinatorError::DuplicateConnection(id),
                // add_member only fails on duplicate connections
                _ => CoordinatorError::InvalidState {
                    connection: connection_id.clone(),
                    event: "join-room",
                },
            })?;

        state
            .connections
            .insert(connection_id.clone(), ConnectionState::Joined(room_id.clone()));

        tracing::info!(
            "Connection '{}' joined room '{}' as user '{}'",
            connection_id,
            room_id,
            member.user_id
        );

        Ok(Notification {
            room_id,
            sender: connection_id,
            audience: Audience::RoomExcludingSender,
            event: OutboundEvent::UserConnected {
                user_id: member.user_id,
            },
        })
    }

    /// Relay a chat message from `connection_id` to its whole room.
    ///
    /// The sender's member record is looked up server-side; whatever sender
    /// identity the client claims in the event payload is not trusted.
    pub async fn chat(
        &self,
        connection_id: &ConnectionId,
        message: MessageContent,
    ) -> Result<Notification, CoordinatorError> {
        let state = self.state.lock().await;

        let room_id = match state.connections.get(connection_id) {
            Some(ConnectionState::Joined(room_id)) => room_id.clone(),
            _ => return Err(CoordinatorError::NotInRoom(connection_id.clone())),
        };

        let sender = state
            .registry
            .member(connection_id)
            .cloned()
            .ok_or_else(|| CoordinatorError::NotInRoom(connection_id.clone()))?;

        Ok(Notification {
            room_id,
            sender: connection_id.clone(),
            audience: Audience::WholeRoom,
            event: OutboundEvent::NewChatMessage { message, sender },
        })
    }

    /// Change the display name of `connection_id`.
    ///
    /// The uniqueness check is server-authoritative and atomic with the
    /// mutation. A taken name yields a sender-only `error-message`
    /// notification and no state change.
    pub async fn rename(
        &self,
        connection_id: &ConnectionId,
        new_display_name: DisplayName,
    ) -> Result<Notification, CoordinatorError> {
        let mut state = self.state.lock().await;

        let room_id = match state.connections.get(connection_id) {
            Some(ConnectionState::Joined(room_id)) => room_id.clone(),
            _ => return Err(CoordinatorError::NotInRoom(connection_id.clone())),
        };

        match state.registry.rename_member(connection_id, new_display_name) {
            Ok((member, old_display_name)) => {
                tracing::info!(
                    "Connection '{}' renamed '{}' -> '{}'",
                    connection_id,
                    old_display_name,
                    member.display_name
                );
                Ok(Notification {
                    room_id,
                    sender: connection_id.clone(),
                    audience: Audience::WholeRoom,
                    event: OutboundEvent::NewDisplayNameRegistered {
                        member,
                        old_display_name,
                    },
                })
            }
            Err(RegistryError::DisplayNameTaken(name)) => Ok(Notification {
                room_id,
                sender: connection_id.clone(),
                audience: Audience::SenderOnly,
                event: OutboundEvent::ErrorMessage {
                    reason: format!(
                        "The display name {name} is already in use in this call!"
                    ),
                },
            }),
            Err(RegistryError::MemberNotFound(id)) => Err(CoordinatorError::NotInRoom(id)),
            // rename_member never reports this; mapped to its natural
            // counterpart rather than swallowed, so a registry change shows up
            Err(RegistryError::DuplicateConnection(id)) => {
                Err(CoordinatorError::DuplicateConnection(id))
            }
        }
    }

    /// Tear down `connection_id`. Unconditional and idempotent: a second
    /// disconnect for the same connection is a no-op, never an error.
    ///
    /// Returns the `user-disconnected` notification for the rest of the room,
    /// or `None` if the connection never joined one.
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> Option<Notification> {
        let mut state = self.state.lock().await;

        match state.connections.remove(connection_id) {
            Some(ConnectionState::Joined(_)) => match state.registry.remove_member(connection_id) {
                Ok((member, room_id)) => {
                    tracing::info!(
                        "Connection '{}' (user '{}') left room '{}'",
                        connection_id,
                        member.user_id,
                        room_id
                    );
                    Some(Notification {
                        room_id,
                        sender: connection_id.clone(),
                        audience: Audience::RoomExcludingSender,
                        event: OutboundEvent::UserDisconnected { member },
                    })
                }
                Err(e) => {
                    // Disconnect may race room teardown; tolerated.
                    tracing::warn!("Disconnect of '{}' found no member: {}", connection_id, e);
                    None
                }
            },
            _ => None,
        }
    }

    /// Resolve a notification's audience to concrete connection ids, reading
    /// the room membership fresh at dispatch time.
    pub async fn recipients(&self, notification: &Notification) -> Vec<ConnectionId> {
        match notification.audience {
            Audience::SenderOnly => vec![notification.sender.clone()],
            Audience::WholeRoom | Audience::RoomExcludingSender => {
                let state = self.state.lock().await;
                let Some(room) = state.registry.room(&notification.room_id) else {
                    return Vec::new();
                };
                match notification.audience {
                    Audience::WholeRoom => room.connections(),
                    _ => room.connections_excluding(&notification.sender),
                }
            }
        }
    }

    /// Snapshot of all active rooms, for the HTTP API.
    pub async fn rooms_snapshot(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        state.registry.rooms_snapshot()
    }

    /// Snapshot of a single room, for the HTTP API.
    pub async fn room_snapshot(&self, room_id: &RoomId) -> Option<Room> {
        let state = self.state.lock().await;
        state.registry.room(room_id).cloned()
    }

    /// Number of transport sessions currently tracked. Test-only: the
    /// connection-state map itself stays private.
    #[cfg(test)]
    pub(crate) async fn tracked_connection_count(&self) -> usize {
        let state = self.state.lock().await;
        state.connections.len()
    }
}
