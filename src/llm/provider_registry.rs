//! Provider Registry for resolving configured models into LLM clients
//!
//! A model name from `[models]` resolves to its provider entry, the provider's
//! API key is read from the environment, and the result is a [`Provider`]
//! ready to create a client.

use crate::llm::client::{LLMClient, ModelParams, Provider};
use crate::types::{AppError, Result};
use crate::utils::toml_config::{resolve_env, CompanionConfig, ModelConfig, ProviderConfig};
use std::collections::HashMap;

/// Registry of named providers and models taken from configuration
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
    models: HashMap<String, ModelConfig>,
}

impl ProviderRegistry {
    /// Create a provider registry from TOML configuration
    pub fn from_config(config: &CompanionConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            models: config.models.clone(),
        }
    }

    /// Resolve a model name to a concrete provider
    pub fn provider_for_model(&self, model_name: &str) -> Result<Provider> {
        let model_config = self.models.get(model_name).ok_or_else(|| {
            AppError::Configuration(format!("Model '{}' not found in configuration", model_name))
        })?;

        let provider_config = self.providers.get(&model_config.provider).ok_or_else(|| {
            AppError::Configuration(format!(
                "Provider '{}' referenced by model '{}' not found",
                model_config.provider, model_name
            ))
        })?;

        provider_from_config(model_config, provider_config)
    }

    /// Create an LLM client for a specific model by name
    pub async fn create_client_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
        self.provider_for_model(model_name)?.create_client().await
    }
}

/// Combine a model entry with its provider entry.
pub fn provider_from_config(model: &ModelConfig, provider: &ProviderConfig) -> Result<Provider> {
    let params = ModelParams {
        temperature: model.temperature,
        max_tokens: model.max_tokens,
    };

    match provider {
        ProviderConfig::OpenAI {
            api_key_env,
            api_base,
            ..
        }
        | ProviderConfig::Gemini {
            api_key_env,
            api_base,
            ..
        } => Ok(Provider::OpenAI {
            api_key: resolve_env(api_key_env)
                .map_err(|e| AppError::Configuration(e.to_string()))?,
            api_base: api_base.clone(),
            model: model.model.clone(),
            params,
        }),
        ProviderConfig::Ollama { base_url, .. } => Ok(Provider::Ollama {
            base_url: base_url.clone(),
            model: model.model.clone(),
            params,
        }),
    }
}
