//! LLM client abstraction and provider selection
//!
//! Two backends are supported:
//! - **OpenAI-compatible** (`openai` feature): OpenAI itself and Google Gemini
//!   through its OpenAI-compatible endpoint
//! - **Ollama** (`ollama` feature): local inference

use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Base URL of Gemini's OpenAI-compatible chat completions endpoint.
pub const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Generic LLM client trait for provider abstraction
///
/// Agents only ever talk to this trait, so tests can swap in scripted clients.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with a system prompt and a single user prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate with a full message list
    async fn generate_with_history(
        &self,
        messages: &[(String, String)], // (role, content) pairs
    ) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Sampling parameters passed with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API or any endpoint speaking its chat completions protocol
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Ollama local LLM provider
    Ollama {
        base_url: String,
        model: String,
        params: ModelParams,
    },
}

impl Provider {
    /// Gemini through its OpenAI-compatible endpoint.
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>, params: ModelParams) -> Self {
        Provider::OpenAI {
            api_key: api_key.into(),
            api_base: GEMINI_OPENAI_BASE.to_string(),
            model: model.into(),
            params,
        }
    }

    /// Copy of this provider with the temperature replaced.
    pub fn with_temperature(&self, temperature: f32) -> Self {
        let mut provider = self.clone();
        match &mut provider {
            Provider::OpenAI { params, .. } | Provider::Ollama { params, .. } => {
                params.temperature = temperature;
            }
        }
        provider
    }

    pub fn params(&self) -> ModelParams {
        match self {
            Provider::OpenAI { params, .. } | Provider::Ollama { params, .. } => *params,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's Cargo feature was not compiled in.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *params,
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                params,
            } => Ok(Box::new(super::ollama::OllamaClient::new(
                base_url,
                model.clone(),
                *params,
            )?)),

            #[allow(unreachable_patterns)]
            other => Err(AppError::LLM(format!(
                "{} provider is not compiled in; rebuild with the '{}' feature",
                other.name(),
                other.feature()
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    fn feature(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Ollama { .. } => "ollama",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_targets_openai_compatible_endpoint() {
        let provider = Provider::gemini("key", "gemini-1.5-flash", ModelParams::default());
        match provider {
            Provider::OpenAI {
                api_base, model, ..
            } => {
                assert_eq!(api_base, GEMINI_OPENAI_BASE);
                assert_eq!(model, "gemini-1.5-flash");
            }
            _ => panic!("Expected OpenAI-compatible provider"),
        }
    }

    #[test]
    fn test_with_temperature_leaves_original_untouched() {
        let provider = Provider::Ollama {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            params: ModelParams::default(),
        };

        let router = provider.with_temperature(0.0);
        assert_eq!(router.params().temperature, 0.0);
        assert_eq!(router.params().max_tokens, 1024);
        assert_eq!(provider.params().temperature, 0.7);
        assert_eq!(router.model(), "llama3.2");
    }

    #[test]
    fn test_provider_name() {
        let provider = Provider::gemini("", "", ModelParams::default());
        assert_eq!(provider.name(), "OpenAI");
    }

    #[cfg(not(feature = "ollama"))]
    #[tokio::test]
    async fn test_disabled_provider_names_feature() {
        let provider = Provider::Ollama {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            params: ModelParams::default(),
        };

        let err = match provider.create_client().await {
            Ok(_) => panic!("Expected error"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("'ollama' feature"));
    }
}
