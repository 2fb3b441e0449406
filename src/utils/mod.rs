//! Configuration and logging utilities.

/// Tracing subscriber setup.
pub mod logging;
/// TOML configuration loading, validation and reloading.
pub mod toml_config;
