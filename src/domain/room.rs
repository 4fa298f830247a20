//! Room entity: an unordered mapping from connection id to member.

use std::collections::HashMap;
use std::fmt;

use super::error::DomainError;
use super::member::{ConnectionId, DisplayName, Member};

/// Opaque room identifier. Externally generated (e.g. a UUID embedded in the
/// call URL); the core never interprets its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    const MAX_LEN: usize = 128;

    pub fn new(value: String) -> Result<Self, DomainError> {
        DomainError::check("room_id", &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    /// Generate a fresh room id for the `/` redirect.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named group of concurrently connected participants.
///
/// Rooms are created implicitly on first join and must not be retained once
/// their member map becomes empty; the registry enforces that lifecycle.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    /// Unix timestamp when the room was created (JST, milliseconds).
    pub created_at: i64,
    members: HashMap<ConnectionId, Member>,
}

impl Room {
    pub fn new(id: RoomId, created_at: i64) -> Self {
        Self {
            id,
            created_at,
            members: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members.get(connection_id)
    }

    pub(super) fn insert_member(&mut self, member: Member) {
        self.members.insert(member.connection_id.clone(), member);
    }

    pub(super) fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        self.members.remove(connection_id)
    }

    pub(super) fn member_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Member> {
        self.members.get_mut(connection_id)
    }

    /// Whether any member other than `requester` currently holds `name`.
    pub fn display_name_taken(&self, name: &DisplayName, requester: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|(id, member)| id != requester && member.display_name == *name)
    }

    /// Snapshot of the current members, sorted by join time (ties broken by
    /// connection id) for consistent ordering.
    pub fn members_snapshot(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.members.values().cloned().collect();
        members.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.connection_id.as_str().cmp(b.connection_id.as_str()))
        });
        members
    }

    /// Connection ids of all members except `exclude`.
    pub fn connections_excluding(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .keys()
            .filter(|id| *id != exclude)
            .cloned()
            .collect()
    }

    /// Connection ids of all members.
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.members.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn member(user: &str, connected_at: i64) -> Member {
        Member::new(
            ConnectionId::generate(),
            UserId::new(user.to_string()).unwrap(),
            connected_at,
        )
    }

    #[test]
    fn test_display_name_taken_ignores_the_requester_itself() {
        // given: a room where "alice" holds her own name
        let mut room = Room::new(RoomId::new("r1".to_string()).unwrap(), 0);
        let alice = member("alice", 1);
        let alice_conn = alice.connection_id.clone();
        room.insert_member(alice);

        // when: alice re-asserts her current name
        let taken = room.display_name_taken(
            &DisplayName::new("alice".to_string()).unwrap(),
            &alice_conn,
        );

        // then: not treated as a conflict
        assert!(!taken);
    }

    #[test]
    fn test_display_name_taken_detects_other_members() {
        // given:
        let mut room = Room::new(RoomId::new("r1".to_string()).unwrap(), 0);
        room.insert_member(member("alice", 1));
        let bob = member("bob", 2);
        let bob_conn = bob.connection_id.clone();
        room.insert_member(bob);

        // when:
        let taken =
            room.display_name_taken(&DisplayName::new("alice".to_string()).unwrap(), &bob_conn);

        // then:
        assert!(taken);
    }

    #[test]
    fn test_members_snapshot_is_sorted_by_join_time() {
        // given:
        let mut room = Room::new(RoomId::new("r1".to_string()).unwrap(), 0);
        room.insert_member(member("charlie", 300));
        room.insert_member(member("alice", 100));
        room.insert_member(member("bob", 200));

        // when:
        let snapshot = room.members_snapshot();

        // then:
        let users: Vec<&str> = snapshot.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob", "charlie"]);
    }
}
