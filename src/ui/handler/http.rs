//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};

use crate::common::time::timestamp_to_jst_rfc3339;
use crate::domain::{Room, RoomId};
use crate::infrastructure::dto::http::{
    MemberDetailDto, RoomDetailDto, RoomPageDto, RoomSummaryDto,
};

use super::super::state::AppState;

/// Requests without a room id are routed to a freshly generated one.
pub async fn redirect_to_new_room() -> Redirect {
    let room_id = RoomId::generate();
    Redirect::temporary(&format!("/rooms/{room_id}"))
}

/// Room entry point for the front-end: echoes the room id (the room itself is
/// created implicitly on first join) and where to open the WebSocket.
pub async fn room_page(Path(room_id): Path<String>) -> Result<Json<RoomPageDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok(Json(RoomPageDto {
        room_id: room_id.as_str().to_string(),
        ws_url: "/ws".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.coordinator.rooms_snapshot().await;

    let summaries: Vec<RoomSummaryDto> = rooms
        .iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            members: room
                .members_snapshot()
                .iter()
                .map(|m| m.user_id.as_str().to_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at),
        })
        .collect();

    Json(summaries)
}

/// Get room detail by id; 404 if the room has no members (absent rooms are
/// never retained).
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let room = state
        .coordinator
        .room_snapshot(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(room_detail_dto(&room)))
}

fn room_detail_dto(room: &Room) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: room
            .members_snapshot()
            .iter()
            .map(|m| MemberDetailDto {
                user_id: m.user_id.as_str().to_string(),
                display_name: m.display_name.as_str().to_string(),
                connected_at: timestamp_to_jst_rfc3339(m.connected_at),
            })
            .collect(),
        created_at: timestamp_to_jst_rfc3339(room.created_at),
    }
}
