//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{response::IntoResponse, routing::get, Router};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    handlers::health::init_server_start();

    Router::new()
        .nest("/api/v1", api_routes())
        // WebSocket gateway endpoint (regular clients and the bridge)
        .route("/gateway", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes (read-only snapshot surface)
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::server_stats))
        .route("/rooms", get(handlers::stats::list_rooms))
        .route("/rooms/{room}/users", get(handlers::stats::room_users))
}
