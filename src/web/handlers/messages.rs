//! Message history handlers for the huddle web surface.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::db::{Message, MessageRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/messages/:group_id - Ordered message backlog for a group.
///
/// Returns the group's messages oldest first, each enriched with sender
/// metadata. An unknown group yields an empty array. The caller owns any
/// retry policy; this endpoint reports a failure exactly once.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let repo = MessageRepository::new(state.db.pool());
    let messages = repo.list_for_group(group_id).await.map_err(|e| {
        tracing::error!("Failed to fetch messages for group {}: {}", group_id, e);
        ApiError::internal("Failed to fetch messages")
    })?;

    Ok(Json(messages))
}
