//! Chat WebSocket handler.
//!
//! One connection is one session: subscribed to its group on upgrade,
//! relaying submissions into the store and draining the group's broadcast
//! feed back out until the socket closes.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::chat::SessionContext;
use crate::db::MessageRepository;
use crate::web::handlers::AppState;

use super::messages::{ClientMessage, ServerMessage};

/// WebSocket chat handler.
///
/// GET /api/chat/ws
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let session = SessionContext::new(&state.session);

    tracing::info!(
        "WebSocket connection {} (user {}, group {})",
        session.connection_id,
        session.user_id,
        session.group_id
    );

    ws.on_upgrade(move |socket| handle_socket(socket, state, session))
}

/// Drive one WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session: SessionContext) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Join the session's group before processing any events, so this
    // connection observes every message published from here on.
    let mut feed = state
        .broadcaster
        .subscribe(&session.connection_id, session.group_id)
        .await;

    loop {
        tokio::select! {
            // Inbound events, handled in arrival order.
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handle_client_message(&mut ws_sender, &state, &session, client_msg)
                                    .await;
                            }
                            Err(e) => {
                                tracing::debug!("Failed to parse client message: {}", e);
                                let error =
                                    ServerMessage::error("invalid_message", "Invalid message format");
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = ws_sender.send(WsMessage::Text(json)).await;
                                }
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        tracing::debug!("WebSocket closed: {}", session.connection_id);
                        break;
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = ws_sender.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error on {}: {}", session.connection_id, e);
                        break;
                    }
                }
            }

            // Broadcast feed for the session's group.
            msg = feed.recv() => {
                match msg {
                    Some(chat_msg) => {
                        let server_msg = ServerMessage::receive(chat_msg);
                        if let Ok(json) = serde_json::to_string(&server_msg) {
                            if ws_sender.send(WsMessage::Text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    // Subscription torn down or replaced; end the session.
                    None => break,
                }
            }
        }
    }

    state.broadcaster.unsubscribe(&session.connection_id).await;
    tracing::debug!("WebSocket session ended: {}", session.connection_id);
}

/// Handle one parsed client message.
async fn handle_client_message(
    ws_sender: &mut futures::stream::SplitSink<WebSocket, WsMessage>,
    state: &AppState,
    session: &SessionContext,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::SendMessage { content } => {
            // Persist first; only a durably stored message is broadcast.
            let repo = MessageRepository::new(state.db.pool());
            match repo.save(session.user_id, &content, session.group_id).await {
                Ok(message) => {
                    state.broadcaster.publish(session.group_id, &message).await;
                }
                Err(e) => {
                    // At-most-once: the submission is dropped and the
                    // client is not notified.
                    tracing::error!(
                        "Failed to save message from {}: {}",
                        session.connection_id,
                        e
                    );
                }
            }
        }

        ClientMessage::Ping => {
            let response = ServerMessage::Pong;
            if let Ok(json) = serde_json::to_string(&response) {
                let _ = ws_sender.send(WsMessage::Text(json)).await;
            }
        }
    }
}
