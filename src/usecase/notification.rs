//! Outbound notifications computed by the coordinator.
//!
//! A notification names its audience symbolically; the relay resolves the
//! audience to concrete connection ids against the current room membership at
//! dispatch time, not from state cached when the event was processed.

use crate::domain::{ConnectionId, DisplayName, Member, MessageContent, RoomId, UserId};

/// Who should receive a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every member currently in the room, including the sender.
    WholeRoom,
    /// Every member currently in the room except the triggering connection.
    RoomExcludingSender,
    /// Only the triggering connection.
    SenderOnly,
}

/// Event payloads broadcast to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// A new user joined; the media layer uses the user id to call them.
    UserConnected { user_id: UserId },

    /// A user left; the media layer tears down the direct session.
    UserDisconnected { member: Member },

    /// Chat text. Includes the sender so every client, the sender included,
    /// renders the identical round-tripped message.
    NewChatMessage {
        message: MessageContent,
        sender: Member,
    },

    /// A display-name change that passed the uniqueness check.
    NewDisplayNameRegistered {
        member: Member,
        old_display_name: DisplayName,
    },

    /// Human-readable failure reason, e.g. a taken display name.
    ErrorMessage { reason: String },
}

/// One outbound message plus the audience it must reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub room_id: RoomId,
    /// The connection whose inbound event produced this notification.
    pub sender: ConnectionId,
    pub audience: Audience,
    pub event: OutboundEvent,
}
