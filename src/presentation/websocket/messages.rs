//! WebSocket Message Types
//!
//! Wire formats for the structured client API. Regular clients exchange
//! `{"event": <name>, "data": {...}}` envelopes; payload fields use the
//! camelCase names the consuming clients expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{Event, RoomSummary};
use crate::shared::error::AppError;

/// Outgoing event envelope
#[derive(Debug, Clone, Serialize)]
pub struct ServerEvent {
    pub event: String,
    pub data: serde_json::Value,
}

impl ServerEvent {
    pub fn new(event: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            event: event.into(),
            data: serde_json::to_value(data).unwrap_or_default(),
        }
    }

    /// Serialized frame for this event.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The `error` event unicast to a triggering connection.
    pub fn error(err: &AppError) -> Self {
        Self::new(
            "error",
            ErrorPayload {
                code: err.code(),
                message: err.to_string(),
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// `join` request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 30, message = "Room name must be 1-30 characters"))]
    pub room: Option<String>,

    pub external_id: Option<String>,
}

/// `send_message` request
#[derive(Debug, Deserialize)]
pub struct SendMessagePayload {
    pub content: String,
}

/// `send_private_message` request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessagePayload {
    #[validate(length(min = 1, message = "Target username is required"))]
    pub target_username: String,

    pub content: String,
}

/// `change_room` request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoomPayload {
    #[validate(length(min = 1, max = 30, message = "Room name must be 1-30 characters"))]
    pub new_room: String,
}

/// `get_room_users` request
#[derive(Debug, Default, Deserialize)]
pub struct RoomUsersQuery {
    pub room: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// `joined` confirmation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedPayload {
    pub room: String,
    pub username: String,
    pub member_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// `message_history` replay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    pub room: String,
    pub messages: Vec<Event>,
}

/// `users_update` room snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersUpdatePayload {
    pub room: String,
    pub users: Vec<String>,
    pub member_count: usize,
}

/// `room_changed` confirmation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomChangedPayload {
    pub room: String,
    pub member_count: usize,
}

/// `rooms_list` snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsListPayload {
    pub rooms: Vec<RoomSummary>,
}

/// `room_users` snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUsersPayload {
    pub room: String,
    pub users: Vec<String>,
}

/// `user_typing` ephemeral notice
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub username: String,
    pub room: String,
    pub typing: bool,
}

/// `receive_private_message` delivery
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateDeliveredPayload {
    pub id: String,
    pub from: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// `private_message_sent` confirmation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSentPayload {
    pub id: String,
    pub to: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// `error` event body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_shape() {
        let frame = ServerEvent::new(
            "room_changed",
            RoomChangedPayload {
                room: "general".into(),
                member_count: 3,
            },
        )
        .to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "room_changed");
        assert_eq!(value["data"]["room"], "general");
        assert_eq!(value["data"]["memberCount"], 3);
    }

    #[test]
    fn test_join_payload_accepts_camel_case_fields() {
        let payload: JoinPayload = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "room": "lobby",
            "externalId": "ext-42"
        }))
        .unwrap();
        assert_eq!(payload.external_id.as_deref(), Some("ext-42"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_join_payload_validation_rejects_long_username() {
        let payload: JoinPayload = serde_json::from_value(serde_json::json!({
            "username": "abcdefghijklmnopqrstu"
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_join_payload_validation_rejects_long_room() {
        let payload: JoinPayload = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "room": "r".repeat(31)
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_change_room_uses_new_room_field() {
        let payload: ChangeRoomPayload =
            serde_json::from_value(serde_json::json!({"newRoom": "general"})).unwrap();
        assert_eq!(payload.new_room, "general");
    }

    #[test]
    fn test_error_event_carries_code() {
        let frame = ServerEvent::error(&AppError::NotAuthenticated).to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["data"]["code"], "not_authenticated");
    }
}
