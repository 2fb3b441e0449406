//! LLM Provider Clients and Abstractions
//!
//! Agents depend only on the [`LLMClient`] trait. Concrete clients are created
//! from a [`Provider`], which the [`ProviderRegistry`] resolves from the
//! `[models]` and `[providers]` sections of the configuration.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` (default) - OpenAI API and Google Gemini via its OpenAI-compatible endpoint
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use study_companion::llm::{ModelParams, Provider};
//!
//! let provider = Provider::gemini(api_key, "gemini-1.5-flash", ModelParams::default());
//! let client = provider.create_client().await?;
//! let reply = client.generate_with_system("You are kind.", "I'm stuck").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Resolution of configured models into providers.
pub mod provider_registry;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, ModelParams, Provider};
pub use provider_registry::ProviderRegistry;
