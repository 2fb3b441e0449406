//! # ADHD Study Companion
//!
//! A chat companion for students with ADHD, built around two personas:
//!
//! - a **Motivation** agent that offers encouragement and validation, and
//! - a **Teaching** agent that explains concepts in small, simple steps.
//!
//! Each message is routed to one of them by keyword heuristics, falling back
//! to a zero-temperature LLM classification when the keywords are
//! inconclusive. Recent conversation history is handed to the Teaching agent
//! so it can build on earlier explanations.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use study_companion::{
//!     agents::{Companion, MotivationAgent, RouterAgent, TeachingAgent},
//!     llm::{ModelParams, Provider},
//!     types::{AgentContext, AgentPreference},
//! };
//!
//! let provider = Provider::gemini(api_key, "gemini-1.5-flash", ModelParams::default());
//! let companion = Companion::new(
//!     Box::new(MotivationAgent::new(provider.create_client().await?)),
//!     Box::new(TeachingAgent::new(provider.create_client().await?)),
//!     RouterAgent::new(provider.with_temperature(0.0).create_client().await?),
//! );
//!
//! let context = AgentContext {
//!     session_id: "demo".into(),
//!     username: "sam".into(),
//!     conversation_history: vec![],
//! };
//! let turn = companion
//!     .respond("Can you explain fractions?", &context, AgentPreference::Auto)
//!     .await?;
//! println!("[{}] {}", turn.agent_label(), turn.response);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI API and Gemini's OpenAI-compatible endpoint (default) |
//! | `ollama` | Ollama local inference |
//!
//! ## Modules
//!
//! - [`agents`] - Personas, router and turn orchestration
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command line parsing and the terminal chat
//! - [`llm`] - LLM client implementations
//! - [`memory`] - Conversation history windowing and storage
//! - [`ratelimit`] - Per-user request limits
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and logging setup

/// Persona agents, routing and orchestration.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Conversation memory.
pub mod memory;
/// Per-user rate limiting.
pub mod ratelimit;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Companion, TurnOutcome};
pub use llm::{LLMClient, Provider, ProviderRegistry};
pub use memory::ConversationStore;
pub use ratelimit::RateLimiter;
pub use types::{AppError, Result};
pub use utils::toml_config::{CompanionConfig, ConfigManager};

use arc_swap::ArcSwap;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration with reload support
    pub config_manager: Arc<ConfigManager>,
    /// The personas and their router; replaced wholesale on reload
    pub companion: Arc<ArcSwap<Companion>>,
    /// Per-session chat history
    pub conversations: Arc<ConversationStore>,
    /// Per-user request limits
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config_manager: ConfigManager, companion: Companion) -> Self {
        let config = config_manager.config();
        Self {
            rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            conversations: Arc::new(ConversationStore::with_capacity(config.chat.max_sessions)),
            companion: Arc::new(ArcSwap::from_pointee(companion)),
            config_manager: Arc::new(config_manager),
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = Arc::new(rate_limiter);
        self
    }

    /// Re-read the configuration file and rebuild the agents from it.
    ///
    /// On any failure the running configuration and agents stay in place.
    /// Stored conversations and rate limit state are kept either way.
    pub async fn reload(&self) -> Result<()> {
        let previous = self.config_manager.config();
        self.config_manager
            .reload()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        let config = self.config_manager.config();
        let registry = ProviderRegistry::from_config(&config);
        match Companion::from_config(&config, &registry).await {
            Ok(companion) => {
                self.companion.store(Arc::new(companion));
                tracing::info!("Agents rebuilt from reloaded configuration");
                Ok(())
            }
            Err(e) => {
                self.config_manager.restore(previous);
                tracing::warn!(error = %e, "Failed to rebuild agents, keeping previous configuration");
                Err(e)
            }
        }
    }
}
