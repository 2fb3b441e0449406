//! Tracing subscriber setup
//!
//! Logs go to stdout and, when configured, to a log file as well. The filter
//! comes from `RUST_LOG` if set, otherwise from `server.log_level`.

use crate::utils::toml_config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. Returns `Ok(false)` if one was already installed.
pub fn init_logging(level: &str, config: &LoggingConfig) -> std::io::Result<bool> {
    install(level, config, true)
}

/// Like [`init_logging`] but without the stdout layer, for the terminal chat.
pub fn init_file_logging(level: &str, config: &LoggingConfig) -> std::io::Result<bool> {
    install(level, config, false)
}

fn install(level: &str, config: &LoggingConfig, stdout: bool) -> std::io::Result<bool> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("study_companion={level},tower_http={level},{level}"))
    });

    let stdout_layer = stdout.then(|| {
        if config.json {
            fmt::layer().json().boxed()
        } else {
            fmt::layer().with_target(true).boxed()
        }
    });

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            Some(if config.json { layer.json().boxed() } else { layer.boxed() })
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok())
}
