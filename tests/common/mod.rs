//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::{body::Body, http::Request, Router};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use relay_server::config::Settings;
use relay_server::presentation::http::routes;
use relay_server::presentation::websocket::ConnectionKind;
use relay_server::startup::AppState;

/// Test application builder
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory state
    pub fn new() -> Self {
        let state = AppState::build(Settings::load().expect("default settings"));
        let router = routes::create_router(state.clone());
        Self { state, router }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Register a regular connection and join it into a room, returning the
    /// connection id and its outbound frame receiver
    pub fn join_user(
        &self,
        username: &str,
        room: &str,
    ) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.gateway.register(id, tx);
        self.state.gateway.classify(id, ConnectionKind::Regular);
        relay_server::presentation::websocket::events::handle_event(
            &self.state,
            id,
            "join",
            serde_json::json!({"username": username, "room": room}),
        );
        (id, rx)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
