use crate::{
    types::{
        AgentContext, AgentPreference, AppError, ChatRequest, ChatResponse, Message, Result,
    },
    AppState,
};
use axum::{extract::State, Json};
use uuid::Uuid;

/// Username used for rate limiting when the request carries none.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Chat with the study companion
///
/// Rate limits the caller, lets the companion answer with the session's
/// history, then records both sides of the turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let username = payload
        .username
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    // The limiter reads and writes its log file
    let limiter = state.rate_limiter.clone();
    let key = username.clone();
    let allowed = tokio::task::spawn_blocking(move || limiter.check_and_log(&key))
        .await
        .map_err(|e| AppError::Internal(format!("Rate limit check failed: {}", e)))?;

    if !allowed {
        return Err(AppError::RateLimited(
            "You have reached the request limit. Please wait a minute and try again.".to_string(),
        ));
    }

    if payload.message.trim().is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let preference = match payload.agent.as_deref() {
        Some(name) => name.parse::<AgentPreference>()?,
        None => AgentPreference::Auto,
    };

    // Get or create session
    let session_id = payload
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let context = AgentContext {
        session_id: session_id.clone(),
        username,
        conversation_history: state.conversations.history(&session_id),
    };

    let companion = state.companion.load_full();
    let outcome = companion
        .respond(&payload.message, &context, preference)
        .await?;

    state.conversations.record_turn(
        &session_id,
        Message::user(payload.message),
        Message::assistant(outcome.response.clone(), outcome.agent),
    );

    Ok(Json(ChatResponse {
        agent: outcome.agent_label().to_string(),
        response: outcome.response,
        session_id,
    }))
}
