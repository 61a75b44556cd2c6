//! WebSocket Connection Handler
//!
//! Accepts connections on the shared transport and demultiplexes the two
//! protocols: the first frame decides whether a connection is the privileged
//! bridge (sentinel token) or a regular client, and every later frame is
//! routed by that classification tag.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::bridge;
use super::events;
use super::framing::LineAssembler;
use super::gateway::ConnectionKind;
use super::messages::ServerEvent;
use super::session::SessionState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let ws = ws
        .max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size);
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let mut session = SessionState::new(connection_id);
    let mut assembler = LineAssembler::new();

    tracing::debug!(connection_id = %connection_id, "New connection");

    let (mut sender, mut receiver) = socket.split();

    // Outbound frames flow through a channel so registry code never holds
    // the socket; a dedicated task forwards them to the wire.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.gateway.register(connection_id, tx);
    metrics::record_connect();

    let sender_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                route_frame(&state, &mut session, &mut assembler, text.as_bytes());
            }
            Ok(Message::Binary(bytes)) => {
                route_frame(&state, &mut session, &mut assembler, &bytes);
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "Connection closed by peer");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // answered by axum
            }
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    events::handle_disconnect(&state, connection_id);
    sender_task.abort();
}

/// Route one raw frame according to the connection's classification.
fn route_frame(
    state: &AppState,
    session: &mut SessionState,
    assembler: &mut LineAssembler,
    raw: &[u8],
) {
    match session.classification {
        ConnectionKind::Unclassified => {
            let text = String::from_utf8_lossy(raw);
            if text.trim() == state.settings.bridge.sentinel {
                session.classification = ConnectionKind::Bridge;
                state
                    .gateway
                    .classify(session.connection_id, ConnectionKind::Bridge);
                metrics::record_bridge_classified();
                state
                    .gateway
                    .send_to_connection(session.connection_id, bridge::ack_frame());
                tracing::info!(
                    connection_id = %session.connection_id,
                    "Bridge connection established"
                );
            } else {
                session.classification = ConnectionKind::Regular;
                state
                    .gateway
                    .classify(session.connection_id, ConnectionKind::Regular);
                dispatch_client_frame(state, session, &text);
            }
        }
        ConnectionKind::Bridge => {
            for control_line in assembler.push(raw) {
                bridge::handle_line(state, session.connection_id, &control_line);
            }
        }
        ConnectionKind::Regular => {
            dispatch_client_frame(state, session, &String::from_utf8_lossy(raw));
        }
    }
}

/// Parse a structured `{"event": ..., "data": ...}` frame and hand it to the
/// event handlers. Unparseable frames produce an `error` event for the
/// sender only.
fn dispatch_client_frame(state: &AppState, session: &SessionState, text: &str) {
    let envelope: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            let err = AppError::Validation(format!("Invalid event frame: {}", e));
            tracing::debug!(
                connection_id = %session.connection_id,
                "Rejecting frame: {}",
                err
            );
            state
                .gateway
                .send_to_connection(session.connection_id, ServerEvent::error(&err).to_frame());
            return;
        }
    };

    let Some(name) = envelope.get("event").and_then(|v| v.as_str()) else {
        let err = AppError::Validation("Missing event name".into());
        state
            .gateway
            .send_to_connection(session.connection_id, ServerEvent::error(&err).to_frame());
        return;
    };

    let data = envelope
        .get("data")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    events::handle_event(state, session.connection_id, name, data);
}
