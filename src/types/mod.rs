use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// "auto", "motivation" or "teaching"; omitted means auto
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Display name of the agent that answered, or "Error"
    pub agent: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

// ============= Agent Types =============

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Motivation,
    Teaching,
}

impl AgentKind {
    pub fn all() -> [AgentKind; 2] {
        [AgentKind::Motivation, AgentKind::Teaching]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Motivation => "motivation",
            AgentKind::Teaching => "teaching",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentKind::Motivation => "Motivation",
            AgentKind::Teaching => "Teaching",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Motivation => "Encouragement and emotional support when studying feels hard",
            AgentKind::Teaching => "Simplified, step-by-step explanations of academic concepts",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AgentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "motivation" => Ok(AgentKind::Motivation),
            "teaching" => Ok(AgentKind::Teaching),
            other => Err(AppError::InvalidInput(format!("Unknown agent: '{}'", other))),
        }
    }
}

/// Which agent should answer a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentPreference {
    #[default]
    Auto,
    Agent(AgentKind),
}

impl FromStr for AgentPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(AgentPreference::Auto);
        }
        s.parse().map(AgentPreference::Agent)
    }
}

#[derive(Debug, Clone)]
pub struct AgentContext {
    pub session_id: String,
    pub username: String,
    pub conversation_history: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Agent that produced an assistant message; `None` for user turns and failed turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentKind>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            agent: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, agent: Option<AgentKind>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            agent,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::LLM(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
