//! Stats API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_stats_on_empty_server() {
    let app = TestApp::new();

    let response = app.get("/api/v1/stats").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["connected_users"], 0);
    assert_eq!(body["active_rooms"], 0);
    assert_eq!(body["rooms"], json!([]));
}

#[tokio::test]
async fn test_stats_reflect_registry_snapshots() {
    let app = TestApp::new();
    let (_a, _rx_a) = app.join_user("alice", "lobby");
    let (_b, _rx_b) = app.join_user("bob", "lobby");
    let (c, _rx_c) = app.join_user("carol", "general");

    // one chat message on top of the join notices
    relay_server::presentation::websocket::events::handle_event(
        &app.state,
        c,
        "send_message",
        json!({"content": "hello"}),
    );

    let response = app.get("/api/v1/stats").await;
    let body = body_json(response).await;

    assert_eq!(body["connected_users"], 3);
    assert_eq!(body["active_connections"], 3);
    assert_eq!(body["active_rooms"], 2);

    let rooms = body["rooms"].as_array().unwrap();
    let general = rooms.iter().find(|r| r["name"] == "general").unwrap();
    assert_eq!(general["member_count"], 1);
    // join notice + chat message
    assert_eq!(general["message_count"], 2);
}

#[tokio::test]
async fn test_rooms_listing() {
    let app = TestApp::new();
    let (_a, _rx_a) = app.join_user("alice", "alpha");
    let (_b, _rx_b) = app.join_user("bob", "alpha");

    let response = app.get("/api/v1/rooms").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["rooms"],
        json!([{"name": "alpha", "memberCount": 2}])
    );
}

#[tokio::test]
async fn test_room_users_endpoint() {
    let app = TestApp::new();
    let (_a, _rx_a) = app.join_user("alice", "alpha");

    let response = app.get("/api/v1/rooms/alpha/users").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["room"], "alpha");
    assert_eq!(body["users"], json!(["alice"]));
}

#[tokio::test]
async fn test_room_users_for_unknown_room_is_404() {
    let app = TestApp::new();

    let response = app.get("/api/v1/rooms/nowhere/users").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "not_found");
}
