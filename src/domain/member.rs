//! Member entity and its identity value objects.

use std::fmt;

use super::error::DomainError;

/// Transport-session identifier, unique per active connection.
///
/// Assigned by the transport layer (one per WebSocket upgrade), never by the
/// client. Opaque to everything except the registry and the pusher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    const MAX_LEN: usize = 64;

    pub fn new(value: String) -> Result<Self, DomainError> {
        DomainError::check("connection_id", &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    /// Generate a fresh connection id for a newly upgraded session.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable peer identifier used by the media-transport layer to address a
/// participant directly. Distinct from [`ConnectionId`]: a user keeps the same
/// `UserId` across reconnects, while every session gets a new connection id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    const MAX_LEN: usize = 128;

    pub fn new(value: String) -> Result<Self, DomainError> {
        DomainError::check("user_id", &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable name shown in the call UI. Unique within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LEN: usize = 64;

    pub fn new(value: String) -> Result<Self, DomainError> {
        DomainError::check("display_name", &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&UserId> for DisplayName {
    /// The display name defaults to the user id until explicitly changed.
    fn from(user_id: &UserId) -> Self {
        Self(user_id.as_str().to_string())
    }
}

/// Chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    const MAX_LEN: usize = 2000;

    pub fn new(value: String) -> Result<Self, DomainError> {
        DomainError::check("message", &value, Self::MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One connected session within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Transport-session identity (process-wide unique).
    pub connection_id: ConnectionId,
    /// Media-layer peer identity.
    pub user_id: UserId,
    /// Current display name; defaults to `user_id` on join.
    pub display_name: DisplayName,
    /// Unix timestamp when the member joined (JST, milliseconds).
    pub connected_at: i64,
}

impl Member {
    pub fn new(connection_id: ConnectionId, user_id: UserId, connected_at: i64) -> Self {
        let display_name = DisplayName::from(&user_id);
        Self {
            connection_id,
            user_id,
            display_name,
            connected_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_display_name_defaults_to_user_id() {
        // given:
        let connection_id = ConnectionId::generate();
        let user_id = UserId::new("u1".to_string()).unwrap();

        // when:
        let member = Member::new(connection_id, user_id, 1000);

        // then:
        assert_eq!(member.display_name.as_str(), "u1");
    }

    #[test]
    fn test_empty_user_id_is_rejected() {
        // given / when:
        let result = UserId::new(String::new());

        // then:
        assert_eq!(result, Err(DomainError::Empty { field: "user_id" }));
    }

    #[test]
    fn test_overlong_display_name_is_rejected() {
        // given:
        let value = "x".repeat(65);

        // when:
        let result = DisplayName::new(value);

        // then:
        assert!(matches!(
            result,
            Err(DomainError::TooLong {
                field: "display_name",
                max: 64,
                len: 65,
            })
        ));
    }

    #[test]
    fn test_generated_connection_ids_are_distinct() {
        // given / when:
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then:
        assert_ne!(a, b);
    }
}
