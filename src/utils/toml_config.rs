//! TOML-based configuration for the study companion
//!
//! Providers, models, agent personas, chat memory windows and rate limits are
//! declared in a TOML file (`companion.toml` by default). API keys are never
//! stored in the file itself; providers name the environment variable that
//! holds them.
//!
//! Use `ConfigManager` for lock-free access to the current configuration and
//! for reloading it from disk at runtime.

use crate::llm::client::GEMINI_OPENAI_BASE;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Root configuration structure loaded from companion.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Persona and router agent configurations
    pub agents: AgentsConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file written alongside stdout; omit to log to stdout only
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("app.log"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            json: false,
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        default_model: String,
    },
    Gemini {
        #[serde(default = "default_gemini_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_base")]
        api_base: String,
        #[serde(default = "default_gemini_model")]
        default_model: String,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        default_model: String,
    },
}

impl ProviderConfig {
    /// Environment variable holding this provider's API key, if it needs one
    pub fn api_key_env(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { api_key_env, .. }
            | ProviderConfig::Gemini { api_key_env, .. } => Some(api_key_env),
            ProviderConfig::Ollama { .. } => None,
        }
    }
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_gemini_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_gemini_base() -> String {
    GEMINI_OPENAI_BASE.to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_model_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_model_max_tokens() -> u32 {
    1024
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub motivation: AgentConfig,
    pub teaching: AgentConfig,
    /// The router always runs at temperature 0 regardless of its model config
    pub router: AgentConfig,
}

impl AgentsConfig {
    fn entries(&self) -> [(&'static str, &AgentConfig); 3] {
        [
            ("motivation", &self.motivation),
            ("teaching", &self.teaching),
            ("router", &self.router),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Reference to a model name defined in [models]
    pub model: String,

    /// Replaces the built-in persona prompt
    #[serde(default)]
    pub system_prompt: Option<String>,
}

// ============= Chat Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Messages of history handed to the answering agent
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Messages of history handed to the router
    #[serde(default = "default_router_history_window")]
    pub router_history_window: usize,

    /// Sessions kept in memory; the least recently used is dropped beyond this
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_history_window() -> usize {
    20
}

fn default_router_history_window() -> usize {
    6
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            router_history_window: default_router_history_window(),
            max_sessions: default_max_sessions(),
        }
    }
}

// ============= Rate Limit Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// JSON file the per-user request log is persisted to
    #[serde(default = "default_rate_limit_log")]
    pub log_file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> usize {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_rate_limit_log() -> Option<PathBuf> {
    Some(PathBuf::from("rate_limit_log.json"))
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            log_file: default_rate_limit_log(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    UnusedModel,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by agent '{1}' does not exist")]
    MissingModel(String, String),
}

impl CompanionConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: CompanionConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        for provider in self.providers.values() {
            if let Some(env) = provider.api_key_env() {
                resolve_env(env)?;
            }
        }

        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
        }

        for (agent_name, agent_config) in self.agents.entries() {
            if !self.models.contains_key(&agent_config.model) {
                return Err(ConfigError::MissingModel(
                    agent_config.model.clone(),
                    agent_name.to_string(),
                ));
            }
        }

        if self.chat.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "chat.history_window must be at least 1".to_string(),
            ));
        }
        if self.chat.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "chat.max_sessions must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused items
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(self.check_unused_providers());
        warnings.extend(self.check_unused_models());

        Ok(warnings)
    }

    fn check_unused_providers(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self.models.values().map(|m| m.provider.as_str()).collect();

        self.providers
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedProvider,
                message: format!(
                    "Provider '{}' is defined but not referenced by any model",
                    name
                ),
            })
            .collect()
    }

    fn check_unused_models(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self
            .agents
            .entries()
            .iter()
            .map(|(_, a)| a.model.as_str())
            .collect();

        self.models
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedModel,
                message: format!(
                    "Model '{}' is defined but not referenced by any agent",
                    name
                ),
            })
            .collect()
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }
}

/// Read the secret named by an `api_key_env` entry.
pub fn resolve_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

// ============= Configuration Manager =============

/// Thread-safe configuration holder with reload support
pub struct ConfigManager {
    config: Arc<ArcSwap<CompanionConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = CompanionConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
        })
    }

    /// Create a config manager directly from a config (useful for testing)
    pub fn from_config(config: CompanionConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("companion.toml"),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<CompanionConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Reload the configuration from disk; the previous config stays active on failure
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!(path = %self.config_path.display(), "Reloading configuration");

        match CompanionConfig::load(&self.config_path) {
            Ok(new_config) => {
                self.config.store(Arc::new(new_config));
                info!("Configuration reloaded successfully");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reload config: {}. Keeping previous config.", e);
                Err(e)
            }
        }
    }

    /// Put back a previously active configuration
    pub fn restore(&self, config: Arc<CompanionConfig>) {
        self.config.store(config);
    }
}

impl Clone for ConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OLLAMA_CONFIG: &str = r#"
[server]
port = 8080

[providers.local]
type = "ollama"
default_model = "llama3.2"

[models.default]
provider = "local"
model = "llama3.2"

[agents.motivation]
model = "default"

[agents.teaching]
model = "default"
system_prompt = "Explain like a patient tutor."

[agents.router]
model = "default"
"#;

    #[test]
    fn test_parse_config_with_defaults() {
        let config: CompanionConfig = toml::from_str(OLLAMA_CONFIG).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("app.log")));
        assert_eq!(config.chat.history_window, 20);
        assert_eq!(config.chat.router_history_window, 6);
        assert_eq!(config.chat.max_sessions, 1000);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.models["default"].temperature, 0.7);
        assert_eq!(
            config.agents.teaching.system_prompt.as_deref(),
            Some("Explain like a patient tutor.")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gemini_provider_defaults() {
        let content = r#"
[providers.google]
type = "gemini"

[agents.motivation]
model = "m"
[agents.teaching]
model = "m"
[agents.router]
model = "m"
"#;
        let config: CompanionConfig = toml::from_str(content).unwrap();

        match config.get_provider("google").unwrap() {
            ProviderConfig::Gemini {
                api_key_env,
                api_base,
                default_model,
            } => {
                assert_eq!(api_key_env, "GOOGLE_API_KEY");
                assert_eq!(api_base, GEMINI_OPENAI_BASE);
                assert_eq!(default_model, "gemini-1.5-flash");
            }
            other => panic!("Expected gemini provider, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_missing_provider() {
        let content = r#"
[models.default]
provider = "nonexistent"
model = "x"
[agents.motivation]
model = "default"
[agents.teaching]
model = "default"
[agents.router]
model = "default"
"#;
        let config: CompanionConfig = toml::from_str(content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingProvider(_, _))
        ));
    }

    #[test]
    fn test_validation_missing_model() {
        let content = OLLAMA_CONFIG.replace(
            "[agents.router]\nmodel = \"default\"",
            "[agents.router]\nmodel = \"fast\"",
        );
        let config: CompanionConfig = toml::from_str(&content).unwrap();

        match config.validate() {
            Err(ConfigError::MissingModel(model, agent)) => {
                assert_eq!(model, "fast");
                assert_eq!(agent, "router");
            }
            other => panic!("Expected MissingModel, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_missing_api_key_env() {
        let content = r#"
[providers.openai]
type = "openai"
api_key_env = "STUDY_COMPANION_TEST_UNSET_KEY"
default_model = "gpt-4o-mini"
[models.default]
provider = "openai"
model = "gpt-4o-mini"
[agents.motivation]
model = "default"
[agents.teaching]
model = "default"
[agents.router]
model = "default"
"#;
        let config: CompanionConfig = toml::from_str(content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEnvVar(name)) if name == "STUDY_COMPANION_TEST_UNSET_KEY"
        ));
    }

    #[test]
    fn test_validation_rejects_zero_windows() {
        let mut config: CompanionConfig = toml::from_str(OLLAMA_CONFIG).unwrap();
        config.chat.history_window = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config: CompanionConfig = toml::from_str(OLLAMA_CONFIG).unwrap();
        config.chat.max_sessions = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config: CompanionConfig = toml::from_str(OLLAMA_CONFIG).unwrap();
        config.rate_limit.max_requests = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unused_items_warnings() {
        let content = format!(
            "{}\n[providers.spare]\ntype = \"ollama\"\ndefault_model = \"x\"\n[models.other]\nprovider = \"local\"\nmodel = \"mistral\"\n",
            OLLAMA_CONFIG
        );
        let config: CompanionConfig = toml::from_str(&content).unwrap();
        let warnings = config.validate_with_warnings().unwrap();

        assert!(warnings
            .iter()
            .any(|w| w.kind == ConfigWarningKind::UnusedModel && w.message.contains("other")));
        assert!(warnings
            .iter()
            .any(|w| w.kind == ConfigWarningKind::UnusedProvider && w.message.contains("spare")));
    }

    #[test]
    fn test_load_missing_file() {
        let result = CompanionConfig::load("/definitely/not/here/companion.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_manager_reload_keeps_previous_on_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OLLAMA_CONFIG.as_bytes()).unwrap();

        let manager = ConfigManager::new(file.path()).unwrap();
        assert_eq!(manager.config().server.port, 8080);

        let updated = OLLAMA_CONFIG.replace("port = 8080", "port = 9090");
        fs::write(file.path(), updated).unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.config().server.port, 9090);

        fs::write(file.path(), "this is not toml [").unwrap();
        assert!(manager.reload().is_err());
        assert_eq!(manager.config().server.port, 9090);
    }
}
