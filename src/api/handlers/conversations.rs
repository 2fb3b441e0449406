//! Conversation handlers.
//!
//! Sessions live only in memory and are created by the first chat turn.

use crate::{
    types::{AppError, ConversationResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Get every message recorded for a session.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>> {
    let messages = state
        .conversations
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?;

    Ok(Json(ConversationResponse {
        session_id: id,
        messages,
    }))
}

/// Forget a session.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.conversations.clear(&id) {
        return Err(AppError::NotFound(format!("Conversation {} not found", id)));
    }

    tracing::info!(session_id = %id, "Conversation cleared");
    Ok(StatusCode::NO_CONTENT)
}
