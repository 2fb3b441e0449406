//! Per-user sliding-window rate limiting.
//!
//! Each user may make `max_requests` requests within `window`. Request
//! timestamps (epoch seconds) are kept per username and, when a log file is
//! configured, persisted as JSON so limits survive restarts and are shared by
//! processes pointing at the same file.

use crate::utils::toml_config::RateLimitConfig;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

type RequestLog = HashMap<String, Vec<f64>>;

pub struct RateLimiter {
    enabled: bool,
    max_requests: usize,
    window: Duration,
    log_path: Option<PathBuf>,
    state: Mutex<RequestLog>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration, log_path: Option<PathBuf>) -> Self {
        Self {
            enabled: true,
            max_requests,
            window,
            log_path,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// A limiter that allows everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(usize::MAX, Duration::ZERO, None)
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
            config.log_file.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a request for `username` now. Returns `false` if over the limit.
    pub fn check_and_log(&self, username: &str) -> bool {
        self.check_and_log_at(username, now_secs())
    }

    /// Record a request made at `now` (epoch seconds).
    ///
    /// A denied request is not recorded, but expired timestamps are still
    /// pruned and written back.
    pub fn check_and_log_at(&self, username: &str, now: f64) -> bool {
        if !self.enabled {
            return true;
        }

        let mut state = self.state.lock();
        if let Some(path) = &self.log_path {
            *state = load_log(path);
        }

        let mut recent = self.recent(&state, username, now);
        let allowed = recent.len() < self.max_requests;
        if allowed {
            recent.push(now);
        }
        state.insert(username.to_string(), recent);

        if let Some(path) = &self.log_path {
            if let Err(e) = save_log(path, &state) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to persist rate limit log");
            }
        }

        if !allowed {
            tracing::warn!(username = %username, "Rate limit exceeded");
        }
        allowed
    }

    /// Requests `username` may still make in the current window.
    pub fn remaining(&self, username: &str) -> usize {
        self.remaining_at(username, now_secs())
    }

    pub fn remaining_at(&self, username: &str, now: f64) -> usize {
        if !self.enabled {
            return usize::MAX;
        }

        let mut state = self.state.lock();
        if let Some(path) = &self.log_path {
            *state = load_log(path);
        }
        self.max_requests
            .saturating_sub(self.recent(&state, username, now).len())
    }

    fn recent(&self, state: &RequestLog, username: &str, now: f64) -> Vec<f64> {
        let window = self.window.as_secs_f64();
        state
            .get(username)
            .map(|times| times.iter().copied().filter(|t| now - t < window).collect())
            .unwrap_or_default()
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Missing or unreadable logs count as empty.
fn load_log(path: &Path) -> RequestLog {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt rate limit log");
            HashMap::new()
        }),
        Err(_) => HashMap::new(),
    }
}

fn save_log(path: &Path, log: &RequestLog) -> std::io::Result<()> {
    let json = serde_json::to_string(log)?;
    std::fs::write(path, json)
}
