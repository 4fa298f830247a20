//! JSON events exchanged with browser clients over WebSocket.
//!
//! Events are tagged by a kebab-case `type` field, matching the event names
//! the front-end listens for.

use serde::{Deserialize, Serialize};

use crate::domain::Member;
use crate::usecase::OutboundEvent;

/// Inbound events, delivered per connection in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Enter a room. Valid only while the connection is unjoined.
    JoinRoom { room_id: String, user_id: String },

    /// Chat text. `sender_id` is a legacy fallback some older clients still
    /// send; the server resolves the sender from its own registry and ignores
    /// the claimed identity.
    SendChat {
        message: String,
        #[serde(default)]
        sender_id: Option<String>,
    },

    /// Request a display-name change. Older protocol variants also carried the
    /// requester's `user_id` and `old_display_name`; both are accepted for
    /// compatibility and ignored, since the server is authoritative for the
    /// uniqueness check and the previous name.
    RegisterDisplayName {
        new_display_name: String,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        old_display_name: Option<String>,
    },
}

/// Member snapshot as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub user_id: String,
    pub display_name: String,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            user_id: member.user_id.as_str().to_string(),
            display_name: member.display_name.as_str().to_string(),
        }
    }
}

/// Outbound events, delivered to the audience computed by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    UserConnected {
        user_id: String,
    },
    UserDisconnected {
        member: MemberDto,
    },
    NewChatMessage {
        message: String,
        sender: MemberDto,
    },
    NewDisplayNameRegistered {
        member: MemberDto,
        old_display_name: String,
    },
    ErrorMessage {
        reason: String,
    },
}

impl From<&OutboundEvent> for ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::UserConnected { user_id } => ServerEvent::UserConnected {
                user_id: user_id.as_str().to_string(),
            },
            OutboundEvent::UserDisconnected { member } => ServerEvent::UserDisconnected {
                member: MemberDto::from(member),
            },
            OutboundEvent::NewChatMessage { message, sender } => ServerEvent::NewChatMessage {
                message: message.as_str().to_string(),
                sender: MemberDto::from(sender),
            },
            OutboundEvent::NewDisplayNameRegistered {
                member,
                old_display_name,
            } => ServerEvent::NewDisplayNameRegistered {
                member: MemberDto::from(member),
                old_display_name: old_display_name.as_str().to_string(),
            },
            OutboundEvent::ErrorMessage { reason } => ServerEvent::ErrorMessage {
                reason: reason.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_room_event_is_parsed() {
        // given:
        let text = r#"{"type":"join-room","room_id":"r1","user_id":"u1"}"#;

        // when:
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        // then:
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: "r1".to_string(),
                user_id: "u1".to_string(),
            }
        );
    }

    #[test]
    fn test_send_chat_parses_with_and_without_legacy_sender_id() {
        // given / when:
        let bare: ClientEvent =
            serde_json::from_str(r#"{"type":"send-chat","message":"hi"}"#).unwrap();
        let legacy: ClientEvent =
            serde_json::from_str(r#"{"type":"send-chat","message":"hi","sender_id":"u1"}"#)
                .unwrap();

        // then:
        assert_eq!(
            bare,
            ClientEvent::SendChat {
                message: "hi".to_string(),
                sender_id: None,
            }
        );
        assert_eq!(
            legacy,
            ClientEvent::SendChat {
                message: "hi".to_string(),
                sender_id: Some("u1".to_string()),
            }
        );
    }

    #[test]
    fn test_register_display_name_accepts_legacy_variants() {
        // given: an older client sending the full legacy payload
        let text = r#"{
            "type": "register-display-name",
            "new_display_name": "alice",
            "user_id": "u2",
            "old_display_name": "u2"
        }"#;

        // when:
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        // then: legacy fields are carried through (and ignored downstream)
        assert_eq!(
            event,
            ClientEvent::RegisterDisplayName {
                new_display_name: "alice".to_string(),
                user_id: Some("u2".to_string()),
                old_display_name: Some("u2".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // given:
        let text = r#"{"type":"launch-missiles"}"#;

        // when:
        let result = serde_json::from_str::<ClientEvent>(text);

        // then:
        assert!(result.is_err());
    }

    #[test]
    fn test_server_events_serialize_with_kebab_case_tags() {
        // given:
        let member = MemberDto {
            user_id: "u2".to_string(),
            display_name: "alice".to_string(),
        };

        // when / then:
        assert_eq!(
            serde_json::to_value(ServerEvent::UserConnected {
                user_id: "u1".to_string()
            })
            .unwrap(),
            json!({"type": "user-connected", "user_id": "u1"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::NewDisplayNameRegistered {
                member: member.clone(),
                old_display_name: "u2".to_string(),
            })
            .unwrap(),
            json!({
                "type": "new-display-name-registered",
                "member": {"user_id": "u2", "display_name": "alice"},
                "old_display_name": "u2"
            })
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::ErrorMessage {
                reason: "nope".to_string()
            })
            .unwrap(),
            json!({"type": "error-message", "reason": "nope"})
        );
    }
}
