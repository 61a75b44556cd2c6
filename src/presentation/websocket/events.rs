//! Regular-Client Event Handlers
//!
//! Implements the structured event API: `join`, `send_message`,
//! `send_private_message`, `typing`/`stop_typing`, `change_room`,
//! `get_rooms`, `get_room_users`, plus disconnect cleanup. Each connection
//! moves `unjoined -> joined(room)`; joined-only events fail with a
//! `not_authenticated` error until a join succeeds.
//!
//! Failures never mutate the registries; the resulting `error` event goes to
//! the triggering connection only.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::domain::Event;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::validation::{sanitize_message, validation_error};
use crate::startup::AppState;

use super::gateway::ConnectionKind;
use super::messages::{
    ChangeRoomPayload, HistoryPayload, JoinPayload, JoinedPayload, PrivateDeliveredPayload,
    PrivateMessagePayload, PrivateSentPayload, RoomChangedPayload, RoomUsersPayload,
    RoomUsersQuery, RoomsListPayload, SendMessagePayload, ServerEvent, TypingPayload,
    UsersUpdatePayload,
};

/// Route one structured client event. Handler failures are unicast back to
/// the caller as an `error` event and touch no other connection.
pub fn handle_event(state: &AppState, connection_id: Uuid, name: &str, data: Value) {
    metrics::record_client_event(name);

    let result = match name {
        "join" => handle_join(state, connection_id, data),
        "send_message" => handle_send_message(state, connection_id, data),
        "send_private_message" => handle_private_message(state, connection_id, data),
        "typing" => handle_typing(state, connection_id, true),
        "stop_typing" => handle_typing(state, connection_id, false),
        "change_room" => handle_change_room(state, connection_id, data),
        "get_rooms" => handle_get_rooms(state, connection_id),
        "get_room_users" => handle_get_room_users(state, connection_id, data),
        other => Err(AppError::Validation(format!("Unknown event: {}", other))),
    };

    if let Err(err) = result {
        tracing::debug!(
            connection_id = %connection_id,
            event = name,
            code = err.code(),
            "Event rejected: {}",
            err
        );
        state
            .gateway
            .send_to_connection(connection_id, ServerEvent::error(&err).to_frame());
    }
}

/// Disconnect cleanup for any classification.
///
/// Bridge connections are only deregistered. A regular connection with an
/// active user leaves presence and room registries, the old room gets a
/// leave notice and a member snapshot, and the deferred history purge is
/// scheduled if the room emptied.
pub fn handle_disconnect(state: &AppState, connection_id: Uuid) {
    let kind = state.gateway.remove(connection_id);
    metrics::record_disconnect(matches!(kind, Some(ConnectionKind::Bridge)));

    match kind {
        Some(ConnectionKind::Bridge) => {
            tracing::info!(connection_id = %connection_id, "Bridge connection closed");
        }
        _ => {
            if let Some(user) = state.presence.leave(connection_id) {
                state.rooms.leave(&user.room, connection_id);
                let notice = leave_notice(connection_id, &user.username, &user.room);
                broadcast_room_event(state, &user.room, "user_left", &notice, true);
                broadcast_users_update(state, &user.room);
            }
        }
    }
}

fn handle_join(state: &AppState, connection_id: Uuid, data: Value) -> Result<(), AppError> {
    let payload: JoinPayload = parse_payload(data)?;
    payload.validate().map_err(validation_error)?;

    let room = payload
        .room
        .clone()
        .unwrap_or_else(|| state.settings.chat.default_room.clone());

    let user = state
        .presence
        .join(connection_id, &payload.username, &room, payload.external_id)?;
    let member_count = state.rooms.join(&room, connection_id);

    // replay context to the new member before anything else
    send_history(state, connection_id, &room);
    send_to(
        state,
        connection_id,
        ServerEvent::new(
            "joined",
            JoinedPayload {
                room: room.clone(),
                username: user.username.clone(),
                member_count,
                external_id: user.external_id.clone(),
            },
        ),
    );

    let notice = join_notice(connection_id, &user.username, &room);
    broadcast_room_event(state, &room, "user_joined", &notice, true);
    broadcast_users_update(state, &room);
    Ok(())
}

fn handle_send_message(state: &AppState, connection_id: Uuid, data: Value) -> Result<(), AppError> {
    let user = state
        .presence
        .get(connection_id)
        .ok_or(AppError::NotAuthenticated)?;

    let payload: SendMessagePayload = parse_payload(data)?;
    let content = sanitize_message(&payload.content, state.settings.chat.max_message_length)?;

    let event = Event::message(
        &connection_id.to_string(),
        &user.username,
        &content,
        &user.room,
    );
    broadcast_room_event(state, &user.room, "receive_message", &event, true);
    Ok(())
}

fn handle_private_message(
    state: &AppState,
    connection_id: Uuid,
    data: Value,
) -> Result<(), AppError> {
    let user = state
        .presence
        .get(connection_id)
        .ok_or(AppError::NotAuthenticated)?;

    let payload: PrivateMessagePayload = parse_payload(data)?;
    payload.validate().map_err(validation_error)?;
    let content = sanitize_message(&payload.content, state.settings.chat.max_message_length)?;

    let target = state
        .presence
        .find_by_username(&payload.target_username)
        .ok_or_else(|| AppError::TargetNotFound(payload.target_username.clone()))?;

    // never appended to history
    let event = Event::private(&connection_id.to_string(), &user.username, &content);
    send_to(
        state,
        target.connection_id,
        ServerEvent::new(
            "receive_private_message",
            PrivateDeliveredPayload {
                id: event.id.clone(),
                from: user.username.clone(),
                content: content.clone(),
                timestamp: event.timestamp,
            },
        ),
    );
    send_to(
        state,
        connection_id,
        ServerEvent::new(
            "private_message_sent",
            PrivateSentPayload {
                id: event.id,
                to: target.username,
                content,
                timestamp: event.timestamp,
            },
        ),
    );
    Ok(())
}

fn handle_typing(state: &AppState, connection_id: Uuid, typing: bool) -> Result<(), AppError> {
    let user = state
        .presence
        .get(connection_id)
        .ok_or(AppError::NotAuthenticated)?;

    // ephemeral: everyone in the room except the typist, never persisted
    let others: Vec<Uuid> = state
        .rooms
        .members_of(&user.room)
        .into_iter()
        .filter(|id| *id != connection_id)
        .collect();
    let frame = ServerEvent::new(
        "user_typing",
        TypingPayload {
            username: user.username,
            room: user.room,
            typing,
        },
    )
    .to_frame();
    state.gateway.send_to_many(&others, &frame);
    Ok(())
}

fn handle_change_room(state: &AppState, connection_id: Uuid, data: Value) -> Result<(), AppError> {
    let user = state
        .presence
        .get(connection_id)
        .ok_or(AppError::NotAuthenticated)?;

    let payload: ChangeRoomPayload = parse_payload(data)?;
    payload.validate().map_err(validation_error)?;
    let new_room = payload.new_room;

    if new_room == user.room {
        send_to(
            state,
            connection_id,
            ServerEvent::new(
                "room_changed",
                RoomChangedPayload {
                    member_count: state.rooms.member_count(&new_room),
                    room: new_room,
                },
            ),
        );
        return Ok(());
    }

    let old_room = user.room.clone();
    let user = state.presence.change_room(connection_id, &new_room)?;
    state.rooms.leave(&old_room, connection_id);

    let notice = leave_notice(connection_id, &user.username, &old_room);
    broadcast_room_event(state, &old_room, "user_left", &notice, true);
    broadcast_users_update(state, &old_room);

    let member_count = state.rooms.join(&new_room, connection_id);
    send_history(state, connection_id, &new_room);

    let notice = join_notice(connection_id, &user.username, &new_room);
    broadcast_room_event(state, &new_room, "user_joined", &notice, true);
    broadcast_users_update(state, &new_room);

    send_to(
        state,
        connection_id,
        ServerEvent::new(
            "room_changed",
            RoomChangedPayload {
                room: new_room,
                member_count,
            },
        ),
    );

    tracing::info!(
        connection_id = %connection_id,
        username = %user.username,
        from = %old_room,
        to = %user.room,
        "User changed room"
    );
    Ok(())
}

fn handle_get_rooms(state: &AppState, connection_id: Uuid) -> Result<(), AppError> {
    send_to(
        state,
        connection_id,
        ServerEvent::new(
            "rooms_list",
            RoomsListPayload {
                rooms: state.rooms.list_rooms(),
            },
        ),
    );
    Ok(())
}

fn handle_get_room_users(
    state: &AppState,
    connection_id: Uuid,
    data: Value,
) -> Result<(), AppError> {
    let query: RoomUsersQuery = parse_payload(data)?;
    let room = query
        .room
        .or_else(|| state.presence.get(connection_id).map(|u| u.room))
        .ok_or_else(|| AppError::Validation("Room is required".into()))?;

    let users = state.presence.usernames_for(&state.rooms.members_of(&room));
    send_to(
        state,
        connection_id,
        ServerEvent::new("room_users", RoomUsersPayload { room, users }),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_payload<T: DeserializeOwned>(data: Value) -> Result<T, AppError> {
    let data = if data.is_null() {
        Value::Object(Default::default())
    } else {
        data
    };
    serde_json::from_value(data)
        .map_err(|e| AppError::Validation(format!("Invalid payload: {}", e)))
}

fn send_to(state: &AppState, connection_id: Uuid, event: ServerEvent) {
    state
        .gateway
        .send_to_connection(connection_id, event.to_frame());
}

fn send_history(state: &AppState, connection_id: Uuid, room: &str) {
    let messages = state.history.snapshot(room);
    send_to(
        state,
        connection_id,
        ServerEvent::new(
            "message_history",
            HistoryPayload {
                room: room.to_string(),
                messages,
            },
        ),
    );
}

/// Broadcast an event to a room's current members and, for persistent
/// kinds, append it to the room's history.
fn broadcast_room_event(
    state: &AppState,
    room: &str,
    event_name: &str,
    event: &Event,
    persist: bool,
) {
    let members = state.rooms.members_of(room);
    let frame = ServerEvent::new(event_name, event).to_frame();
    state.gateway.send_to_many(&members, &frame);
    if persist {
        state.history.append(room, event.clone());
    }
}

fn broadcast_users_update(state: &AppState, room: &str) {
    let members = state.rooms.members_of(room);
    if members.is_empty() {
        return;
    }
    let users = state.presence.usernames_for(&members);
    let frame = ServerEvent::new(
        "users_update",
        UsersUpdatePayload {
            room: room.to_string(),
            member_count: members.len(),
            users,
        },
    )
    .to_frame();
    state.gateway.send_to_many(&members, &frame);
}

fn join_notice(connection_id: Uuid, username: &str, room: &str) -> Event {
    Event::system(
        &connection_id.to_string(),
        &format!("{} joined the room", username),
        room,
    )
}

fn leave_notice(connection_id: Uuid, username: &str, room: &str) -> Event {
    Event::system(
        &connection_id.to_string(),
        &format!("{} left the room", username),
        room,
    )
}
