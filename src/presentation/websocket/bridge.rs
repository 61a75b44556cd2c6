//! Bridge Adapter
//!
//! Consumes newline-delimited JSON control messages from the privileged
//! application server and translates them into registry and dispatch
//! operations. The channel is trusted: no username or room validation is
//! applied. A line that fails to parse is logged and discarded without
//! closing the connection or touching any registry.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::Event;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::messages::ServerEvent;

/// Canonical "message received" event name; `emit_to_room` payloads carrying
/// it are also appended to room history.
const MESSAGE_EVENT: &str = "receive_message";

/// Room kind that broadcasts a creation notice to every client
const COLLABORATION_ROOM: &str = "collaboration";

/// Room kind that is tracked silently
const DIRECT_ROOM: &str = "direct";

#[derive(Debug, Deserialize)]
struct EmitControl {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct EmitToRoomControl {
    room: String,
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RoomDescriptor {
    name: Option<String>,
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl RoomDescriptor {
    fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct RoomCreatedControl {
    #[serde(default)]
    room: RoomDescriptor,
    #[serde(default)]
    new_user: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PresenceUpdateControl {
    user_id: String,
    status: String,
    #[serde(default)]
    room: Option<String>,
}

/// Acknowledgment line sent after sentinel classification.
pub fn ack_frame() -> String {
    line(serde_json::json!({
        "type": "bridge_ack",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}

fn pong_frame() -> String {
    line(serde_json::json!({
        "type": "pong",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}

fn line(value: Value) -> String {
    let mut frame = value.to_string();
    frame.push('\n');
    frame
}

/// Handle one reassembled control line from a bridge connection.
pub fn handle_line(state: &AppState, connection_id: Uuid, raw: &str) {
    let message: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            let err = AppError::MalformedControlMessage(e.to_string());
            tracing::warn!(connection_id = %connection_id, "Discarding bridge line: {}", err);
            return;
        }
    };

    let Some(kind) = message.get("type").and_then(Value::as_str) else {
        tracing::warn!(connection_id = %connection_id, "Bridge message has no type field");
        return;
    };
    metrics::record_bridge_control(kind);

    match kind {
        "emit" => handle_emit(state, connection_id, message),
        "emit_to_room" => handle_emit_to_room(state, connection_id, message),
        "room_created" => handle_room_created(state, connection_id, message),
        "presence_update" => handle_presence_update(state, connection_id, message),
        "ping" => {
            state.gateway.send_to_connection(connection_id, pong_frame());
        }
        "heartbeat" | "disconnect" => {
            tracing::debug!(connection_id = %connection_id, kind = kind, "Bridge keepalive");
        }
        other => {
            tracing::warn!(
                connection_id = %connection_id,
                kind = other,
                "Ignoring unknown bridge control type"
            );
        }
    }
}

fn parse_control<T: serde::de::DeserializeOwned>(
    connection_id: Uuid,
    kind: &str,
    message: Value,
) -> Option<T> {
    match serde_json::from_value(message) {
        Ok(control) => Some(control),
        Err(e) => {
            let err = AppError::MalformedControlMessage(e.to_string());
            tracing::warn!(
                connection_id = %connection_id,
                kind = kind,
                "Discarding bridge message: {}",
                err
            );
            None
        }
    }
}

fn handle_emit(state: &AppState, connection_id: Uuid, message: Value) {
    let Some(control) = parse_control::<EmitControl>(connection_id, "emit", message) else {
        return;
    };
    tracing::debug!(event = %control.event, "Bridge global emit");
    state
        .gateway
        .send_global(&ServerEvent::new(control.event, control.data).to_frame());
}

fn handle_emit_to_room(state: &AppState, connection_id: Uuid, message: Value) {
    let Some(control) = parse_control::<EmitToRoomControl>(connection_id, "emit_to_room", message)
    else {
        return;
    };

    state.rooms.ensure(&control.room);
    let members = state.rooms.members_of(&control.room);
    let frame = ServerEvent::new(control.event.clone(), control.data.clone()).to_frame();
    state.gateway.send_to_many(&members, &frame);

    if control.event == MESSAGE_EVENT {
        let username = control
            .data
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or("bridge");
        let content = control
            .data
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        state
            .history
            .append(&control.room, Event::message("bridge", username, content, &control.room));
    }

    tracing::debug!(
        room = %control.room,
        event = %control.event,
        recipients = members.len(),
        "Bridge room emit"
    );
}

fn handle_room_created(state: &AppState, connection_id: Uuid, message: Value) {
    let Some(control) = parse_control::<RoomCreatedControl>(connection_id, "room_created", message)
    else {
        return;
    };
    let Some(room) = control.room.label() else {
        tracing::warn!(connection_id = %connection_id, "room_created without a room name");
        return;
    };

    state.rooms.ensure(room);

    match control.room.kind.as_deref() {
        Some(COLLABORATION_ROOM) => {
            let notice = ServerEvent::new(
                "room_created",
                serde_json::json!({
                    "room": room,
                    "newUser": control.new_user,
                }),
            );
            state.gateway.send_global(&notice.to_frame());
            tracing::info!(room = %room, "Collaboration room created");
        }
        Some(DIRECT_ROOM) => {
            tracing::info!(room = %room, "Direct room created");
        }
        other => {
            tracing::debug!(room = %room, kind = ?other, "Room created");
        }
    }
}

fn handle_presence_update(state: &AppState, connection_id: Uuid, message: Value) {
    let Some(control) =
        parse_control::<PresenceUpdateControl>(connection_id, "presence_update", message)
    else {
        return;
    };

    let event = Event::presence(
        "bridge",
        &control.user_id,
        &control.status,
        control.room.as_deref(),
    );
    let frame = ServerEvent::new("presence_update", &event).to_frame();

    match control.room {
        Some(room) => {
            let members = state.rooms.members_of(&room);
            state.gateway.send_to_many(&members, &frame);
            state.history.append(&room, event);
        }
        None => state.gateway.send_global(&frame),
    }
}
