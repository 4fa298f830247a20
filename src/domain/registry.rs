//! In-memory room registry.
//!
//! Pure state container mapping room ids to member records, plus a reverse
//! index from connection id to room so disconnect and rename can be addressed
//! by connection alone. No I/O; callers are responsible for serializing
//! mutations (the coordinator holds the registry behind a mutex).

use std::collections::HashMap;

use thiserror::Error;

use super::member::{ConnectionId, DisplayName, Member, UserId};
use super::room::{Room, RoomId};

/// Storage-level failures. Policy (what to surface to clients) lives in the
/// coordinator; the registry only reports what happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The transport layer guarantees unique connection ids, so this indicates
    /// an integration defect rather than a user error.
    #[error("connection '{0}' is already registered in a room")]
    DuplicateConnection(ConnectionId),

    #[error("connection '{0}' is not a member of any room")]
    MemberNotFound(ConnectionId),

    #[error("the display name '{0}' is already in use in this room")]
    DisplayNameTaken(DisplayName),
}

/// Registry of all active rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    /// Reverse index: which room each connection currently belongs to.
    connections: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member into `room_id`, creating the room if absent.
    ///
    /// The member's display name defaults to its user id. Fails with
    /// [`RegistryError::DuplicateConnection`] if the connection is already a
    /// member of any room; the existing record is never silently overwritten.
    pub fn add_member(
        &mut self,
        room_id: RoomId,
        connection_id: ConnectionId,
        user_id: UserId,
        connected_at: i64,
    ) -> Result<Member, RegistryError> {
        if self.connections.contains_key(&connection_id) {
            return Err(RegistryError::DuplicateConnection(connection_id));
        }

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), connected_at));

        let member = Member::new(connection_id.clone(), user_id, connected_at);
        room.insert_member(member.clone());
        self.connections.insert(connection_id, room_id);

        Ok(member)
    }

    /// Remove the member identified by `connection_id` from its room.
    ///
    /// If the room becomes empty it is removed as well; no dangling empty
    /// rooms are retained. Returns the removed member and the room it was in.
    pub fn remove_member(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<(Member, RoomId), RegistryError> {
        let room_id = self
            .connections
            .remove(connection_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        // The reverse index and the room map are updated together, so a
        // missing room here would be a bookkeeping bug.
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        let member = room
            .remove_member(connection_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        if room.is_empty() {
            self.rooms.remove(&room_id);
        }

        Ok((member, room_id))
    }

    /// Change the display name of the member identified by `connection_id`.
    ///
    /// Fails with [`RegistryError::DisplayNameTaken`] if any other member of
    /// the same room already holds `new_display_name`; in that case nothing is
    /// mutated. On success returns the updated member and the previous name.
    pub fn rename_member(
        &mut self,
        connection_id: &ConnectionId,
        new_display_name: DisplayName,
    ) -> Result<(Member, DisplayName), RegistryError> {
        let room_id = self
            .connections
            .get(connection_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        if room.display_name_taken(&new_display_name, connection_id) {
            return Err(RegistryError::DisplayNameTaken(new_display_name));
        }

        let member = room
            .member_mut(connection_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.clone()))?;

        let old_display_name = std::mem::replace(&mut member.display_name, new_display_name);
        Ok((member.clone(), old_display_name))
    }

    /// Look up the member record for `connection_id`, if it is in a room.
    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        let room_id = self.connections.get(connection_id)?;
        self.rooms.get(room_id)?.member(connection_id)
    }

    /// Which room `connection_id` currently belongs to.
    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.connections.get(connection_id)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Snapshot of the members of `room_id`; empty if the room is absent.
    pub fn room_members(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|room| room.members_snapshot())
            .unwrap_or_default()
    }

    /// Snapshot of all active rooms, sorted by creation time for consistent
    /// listing.
    pub fn rooms_snapshot(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
