//! Event relay.
//!
//! The boundary between the many concurrent transport sessions and the single
//! coordinator: inbound events are forwarded to the coordinator, and the
//! resulting notifications are serialized and fanned out to the audience
//! resolved from the room membership at dispatch time.
//!
//! All coordinator errors are handled here with a log line and a dropped
//! event; nothing propagates to the transport as a failure. The only
//! user-visible failure is the `error-message` event the coordinator itself
//! emits for a taken display name.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, MessageContent, MessagePusher, PusherChannel, RoomId, UserId,
};
use crate::usecase::{Audience, MembershipCoordinator, Notification};

use super::dto::websocket::ServerEvent;

/// Bridges coordinator output to pusher dispatch.
pub struct EventRelay {
    coordinator: Arc<MembershipCoordinator>,
    pusher: Arc<dyn MessagePusher>,
}

impl EventRelay {
    pub fn new(coordinator: Arc<MembershipCoordinator>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { coordinator, pusher }
    }

    /// A transport session opened: register its outbound channel and record
    /// the connection as unjoined.
    pub async fn open_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.pusher
            .register_connection(connection_id.clone(), sender)
            .await;
        self.coordinator.register_connection(connection_id).await;
    }

    pub async fn handle_join(&self, connection_id: &ConnectionId, room_id: RoomId, user_id: UserId) {
        match self
            .coordinator
            .join(room_id, connection_id.clone(), user_id)
            .await
        {
            Ok(notification) => self.dispatch(notification).await,
            Err(e) => tracing::warn!("Dropped join-room from '{}': {}", connection_id, e),
        }
    }

    pub async fn handle_chat(&self, connection_id: &ConnectionId, message: MessageContent) {
        match self.coordinator.chat(connection_id, message).await {
            Ok(notification) => self.dispatch(notification).await,
            Err(e) => tracing::warn!("Dropped send-chat from '{}': {}", connection_id, e),
        }
    }

    pub async fn handle_rename(&self, connection_id: &ConnectionId, new_display_name: DisplayName) {
        match self.coordinator.rename(connection_id, new_display_name).await {
            Ok(notification) => self.dispatch(notification).await,
            Err(e) => {
                tracing::warn!(
                    "Dropped register-display-name from '{}': {}",
                    connection_id,
                    e
                );
            }
        }
    }

    /// A transport session ended. Unconditional and idempotent.
    pub async fn handle_disconnect(&self, connection_id: &ConnectionId) {
        if let Some(notification) = self.coordinator.disconnect(connection_id).await {
            self.dispatch(notification).await;
        }
        self.pusher.unregister_connection(connection_id).await;
    }

    async fn dispatch(&self, notification: Notification) {
        let event = ServerEvent::from(&notification.event);
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                return;
            }
        };

        match notification.audience {
            Audience::SenderOnly => {
                // The session may already be gone; delivery failure is not
                // surfaced to anyone.
                if let Err(e) = self.pusher.push_to(&notification.sender, &json).await {
                    tracing::warn!(
                        "Failed to push to triggering connection '{}': {}",
                        notification.sender,
                        e
                    );
                }
            }
            Audience::WholeRoom | Audience::RoomExcludingSender => {
                let recipients = self.coordinator.recipients(&notification).await;
                self.pusher.broadcast(recipients, &json).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessagePusher;
    use crate::infrastructure::dto::websocket::MemberDto;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn user_id(value: &str) -> UserId {
        UserId::new(value.to_string()).unwrap()
    }

    fn display_name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    fn message(value: &str) -> MessageContent {
        MessageContent::new(value.to_string()).unwrap()
    }

    /// Relay wired to a real channel-backed pusher, returning receivers so
    /// tests can observe what each connection was sent.
    async fn relay_with_channels() -> (EventRelay, Arc<MembershipCoordinator>) {
        let coordinator = Arc::new(MembershipCoordinator::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        (EventRelay::new(coordinator.clone(), pusher), coordinator)
    }

    async fn open_and_join(
        relay: &EventRelay,
        room: &str,
        user: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        relay.open_connection(connection.clone(), tx).await;
        relay
            .handle_join(&connection, room_id(room), user_id(user))
            .await;
        (connection, rx)
    }

    #[tokio::test]
    async fn test_join_notifies_existing_members_only() {
        // given: alice already in the room
        let (relay, _) = relay_with_channels().await;
        let (_alice, mut rx_alice) = open_and_join(&relay, "r1", "u1").await;

        // when: bob joins
        let (_bob, mut rx_bob) = open_and_join(&relay, "r1", "u2").await;

        // then: alice is told about u2, bob receives nothing
        let received = rx_alice.recv().await.unwrap();
        assert_eq!(
            serde_json::from_str::<ServerEvent>(&received).unwrap(),
            ServerEvent::UserConnected {
                user_id: "u2".to_string()
            }
        );
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_chat_round_trips_to_every_member_including_sender() {
        // given:
        let (relay, _) = relay_with_channels().await;
        let (alice, mut rx_alice) = open_and_join(&relay, "r1", "u1").await;
        let (_bob, mut rx_bob) = open_and_join(&relay, "r1", "u2").await;
        // drain bob's join notification on alice's side
        let _ = rx_alice.recv().await;

        // when:
        relay.handle_chat(&alice, message("hello")).await;

        // then: identical message for both, sender snapshot attached
        let expected = ServerEvent::NewChatMessage {
            message: "hello".to_string(),
            sender: MemberDto {
                user_id: "u1".to_string(),
                display_name: "u1".to_string(),
            },
        };
        let for_alice: ServerEvent =
            serde_json::from_str(&rx_alice.recv().await.unwrap()).unwrap();
        let for_bob: ServerEvent = serde_json::from_str(&rx_bob.recv().await.unwrap()).unwrap();
        assert_eq!(for_alice, expected);
        assert_eq!(for_bob, expected);
    }

    #[tokio::test]
    async fn test_chat_from_unjoined_connection_sends_nothing() {
        // given: a connection that opened but never joined, plus a bystander
        let (relay, _) = relay_with_channels().await;
        let (_member, mut rx_member) = open_and_join(&relay, "r1", "u1").await;
        let loner = ConnectionId::generate();
        let (tx, mut rx_loner) = mpsc::unbounded_channel();
        relay.open_connection(loner.clone(), tx).await;

        // when:
        relay.handle_chat(&loner, message("into the void")).await;

        // then: dropped silently, nobody receives anything
        assert!(rx_member.try_recv().is_err());
        assert!(rx_loner.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // given:
        let (relay, coordinator) = relay_with_channels().await;
        let (alice, _rx_alice) = open_and_join(&relay, "r1", "u1").await;
        let (_bob, mut rx_bob) = open_and_join(&relay, "r1", "u2").await;

        // when: alice's session ends
        relay.handle_disconnect(&alice).await;

        // then: bob receives the member snapshot, the room keeps only bob
        let received: ServerEvent =
            serde_json::from_str(&rx_bob.recv().await.unwrap()).unwrap();
        let ServerEvent::UserDisconnected { member } = received else {
            panic!("expected user-disconnected");
        };
        assert_eq!(member.user_id, "u1");
        assert_eq!(member.display_name, "u1");
        let room = coordinator.room_snapshot(&room_id("r1")).await.unwrap();
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_rename_conflict_is_pushed_to_sender_only() {
        // given: a mocked pusher that must see exactly one sender-only push
        let coordinator = Arc::new(MembershipCoordinator::new());
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        coordinator.register_connection(alice.clone()).await;
        coordinator.register_connection(bob.clone()).await;
        coordinator
            .join(room_id("r1"), alice.clone(), user_id("alice"))
            .await
            .unwrap();
        coordinator
            .join(room_id("r1"), bob.clone(), user_id("bob"))
            .await
            .unwrap();

        let mut pusher = MockMessagePusher::new();
        let expected_target = bob.clone();
        pusher
            .expect_push_to()
            .withf(move |target, content| {
                *target == expected_target && content.contains("error-message")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        pusher.expect_broadcast().times(0);
        let relay = EventRelay::new(coordinator, Arc::new(pusher));

        // when: bob requests alice's name
        relay.handle_rename(&bob, display_name("alice")).await;

        // then: expectations checked on drop of the mock
    }
}
