//! Stats Handlers
//!
//! Read-only snapshot surface over the presence, room, and history
//! registries for dashboards and monitoring.
//!
//! # Endpoints
//! - `GET /api/v1/stats` - Server-wide counters plus per-room details
//! - `GET /api/v1/rooms` - Room listing with member counts
//! - `GET /api/v1/rooms/{room}/users` - Usernames currently in a room

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::domain::RoomSummary;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Server-wide statistics
#[derive(Debug, Serialize)]
pub struct ServerStats {
    pub connected_users: usize,
    pub active_connections: usize,
    pub bridge_connections: usize,
    pub active_rooms: usize,
    pub rooms: Vec<RoomStats>,
}

/// Per-room statistics
#[derive(Debug, Serialize)]
pub struct RoomStats {
    pub name: String,
    pub member_count: usize,
    pub message_count: usize,
}

/// Room listing response
#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub rooms: Vec<RoomSummary>,
}

/// Room user listing response
#[derive(Debug, Serialize)]
pub struct RoomUsersResponse {
    pub room: String,
    pub users: Vec<String>,
}

/// Server-wide stats snapshot
pub async fn server_stats(State(state): State<AppState>) -> Json<ServerStats> {
    let rooms: Vec<RoomStats> = state
        .rooms
        .list_rooms()
        .into_iter()
        .map(|summary| RoomStats {
            message_count: state.history.message_count(&summary.name),
            name: summary.name,
            member_count: summary.member_count,
        })
        .collect();

    Json(ServerStats {
        connected_users: state.presence.count(),
        active_connections: state.gateway.connection_count(),
        bridge_connections: state.gateway.bridge_count(),
        active_rooms: rooms.len(),
        rooms,
    })
}

/// Room listing snapshot
pub async fn list_rooms(State(state): State<AppState>) -> Json<RoomsResponse> {
    Json(RoomsResponse {
        rooms: state.rooms.list_rooms(),
    })
}

/// Usernames currently in a room
pub async fn room_users(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<RoomUsersResponse>, AppError> {
    if !state.rooms.contains(&room) {
        return Err(AppError::NotFound(format!("Room {} does not exist", room)));
    }
    let users = state.presence.usernames_for(&state.rooms.members_of(&room));
    Ok(Json(RoomUsersResponse { room, users }))
}
