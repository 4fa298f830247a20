//! JSON bodies of the HTTP API.

use serde::Serialize;

/// Entry point returned for `GET /rooms/{room_id}`: tells the front-end which
/// room id to join and where the WebSocket endpoint lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomPageDto {
    pub room_id: String,
    pub ws_url: String,
}

/// One room in the `GET /api/rooms` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// User ids of the current members.
    pub members: Vec<String>,
    /// RFC 3339, JST.
    pub created_at: String,
}

/// Full room state for `GET /api/rooms/{room_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    /// RFC 3339, JST.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDetailDto {
    pub user_id: String,
    pub display_name: String,
    /// RFC 3339, JST.
    pub connected_at: String,
}
