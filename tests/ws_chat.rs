//! WebSocket Chat Tests
//!
//! End-to-end tests for the real-time channel: submit over one
//! connection, observe the fan-out on all of them, and confirm the
//! backlog afterwards.

use std::sync::Arc;
use std::time::Duration;

use axum_test::{TestServer, TestServerConfig, Transport};
use huddle::config::SessionConfig;
use huddle::web::handlers::AppState;
use huddle::web::router::{create_health_router, create_router};
use huddle::Database;
use serde_json::{json, Value};

/// Default timeout for waiting on server-side state changes.
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a WebSocket-capable test server with an in-memory database.
///
/// Returns the shared state as well, so tests can observe the
/// broadcaster directly.
async fn create_test_server() -> (TestServer, Arc<AppState>, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(db.clone(), SessionConfig::default()));
    let router = create_router(app_state.clone()).merge(create_health_router());

    let config = TestServerConfig {
        transport: Some(Transport::HttpRandomPort),
        ..TestServerConfig::default()
    };
    let server = TestServer::new_with_config(router, config).expect("Failed to create test server");

    (server, app_state, db)
}

/// Wait until the group has the expected number of live subscribers.
async fn wait_for_subscribers(state: &AppState, group_id: i64, expected: usize) {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    loop {
        if state.broadcaster.subscriber_count(group_id).await == expected {
            return;
        }
        if tokio::time::Instant::now() > deadline {
            panic!(
                "Timed out waiting for {} subscribers in group {}",
                expected, group_id
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_sender_receives_own_echo() {
    let (server, state, _db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    ws.send_json(&json!({"type": "send_message", "content": "hello"}))
        .await;

    let reply: Value = ws.receive_json().await;
    assert_eq!(reply["type"], "receive_message");
    assert_eq!(reply["content"], "hello");
    // Default session identity is the seeded placeholder user.
    assert_eq!(reply["sender_id"], 1);
    assert_eq!(reply["username"], "guest");
    assert_eq!(reply["is_anonymous"], true);
    assert!(reply["message_id"].as_i64().unwrap() >= 1);
    assert!(reply["timestamp"].is_string());
}

#[tokio::test]
async fn test_fan_out_reaches_all_connections() {
    let (server, state, _db) = create_test_server().await;

    let mut ws1 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    let mut ws2 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 2).await;

    ws1.send_json(&json!({"type": "send_message", "content": "to everyone"}))
        .await;

    let seen1: Value = ws1.receive_json().await;
    let seen2: Value = ws2.receive_json().await;

    assert_eq!(seen1["content"], "to everyone");
    assert_eq!(seen2["content"], "to everyone");
    assert_eq!(seen1["message_id"], seen2["message_id"]);
}

#[tokio::test]
async fn test_messages_observed_in_publish_order() {
    let (server, state, _db) = create_test_server().await;

    let mut ws1 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    let mut ws2 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 2).await;

    for i in 0..5 {
        ws1.send_json(&json!({"type": "send_message", "content": format!("msg {i}")}))
            .await;
        // The sender observes its own echo before sending the next one,
        // so the publish order is fixed.
        let echo: Value = ws1.receive_json().await;
        assert_eq!(echo["content"], format!("msg {i}"));
    }

    let mut last_id = 0;
    for i in 0..5 {
        let seen: Value = ws2.receive_json().await;
        assert_eq!(seen["content"], format!("msg {i}"));
        let id = seen["message_id"].as_i64().unwrap();
        assert!(id > last_id);
        last_id = id;
    }
}

#[tokio::test]
async fn test_relayed_messages_are_persisted() {
    let (server, state, _db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    ws.send_json(&json!({"type": "send_message", "content": "durable"}))
        .await;
    let echo: Value = ws.receive_json().await;

    // The backlog serves the same record the broadcast carried.
    let response = server.get("/api/messages/1").await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["message_id"], echo["message_id"]);
    assert_eq!(body[0]["content"], "durable");
    assert_eq!(body[0]["username"], "guest");
}

#[tokio::test]
async fn test_disconnect_cleans_up_subscription() {
    let (server, state, _db) = create_test_server().await;

    let mut ws1 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    let ws2 = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 2).await;

    drop(ws2);
    wait_for_subscribers(&state, 1, 1).await;

    // Publishing to the group still works and reaches the live connection.
    ws1.send_json(&json!({"type": "send_message", "content": "after leave"}))
        .await;
    let echo: Value = ws1.receive_json().await;
    assert_eq!(echo["content"], "after leave");
}

#[tokio::test]
async fn test_ping_pong() {
    let (server, state, _db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    ws.send_json(&json!({"type": "ping"})).await;
    let reply: Value = ws.receive_json().await;
    assert_eq!(reply["type"], "pong");
}

#[tokio::test]
async fn test_malformed_frame_gets_error_reply_and_connection_survives() {
    let (server, state, _db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    ws.send_text("this is not json").await;
    let reply: Value = ws.receive_json().await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "invalid_message");

    // The connection keeps working.
    ws.send_json(&json!({"type": "send_message", "content": "still here"}))
        .await;
    let echo: Value = ws.receive_json().await;
    assert_eq!(echo["content"], "still here");
}

#[tokio::test]
async fn test_client_cannot_override_sender_identity() {
    let (server, state, _db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    // Extra identity fields in the payload are ignored; the session's
    // configured identity wins.
    ws.send_json(&json!({
        "type": "send_message",
        "content": "spoofed",
        "sender_id": 999,
        "group_id": 42
    }))
    .await;

    let echo: Value = ws.receive_json().await;
    assert_eq!(echo["sender_id"], 1);

    // Nothing landed in group 42.
    let response = server.get("/api/messages/42").await;
    let body: Vec<Value> = response.json();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_failed_persistence_is_silently_dropped() {
    let (server, state, db) = create_test_server().await;

    let mut ws = server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;
    wait_for_subscribers(&state, 1, 1).await;

    // Kill the storage layer out from under the session.
    db.pool().close().await;

    ws.send_json(&json!({"type": "send_message", "content": "lost"}))
        .await;

    // No receive_message arrives for the dropped submission; the next
    // frame through is the pong.
    ws.send_json(&json!({"type": "ping"})).await;
    let reply: Value = ws.receive_json().await;
    assert_eq!(reply["type"], "pong");
}
