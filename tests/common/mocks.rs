//! Mock implementations for testing.
//!
//! Clones of a [`MockLLMClient`] share their script and call log, so a test
//! can keep one handle while the agent owns another.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use study_companion::llm::LLMClient;
use study_companion::types::{AppError, Result};

/// Scripted LLM client.
///
/// Queued responses are returned first, then the default response forever.
/// Every call is recorded as the list of `(role, content)` messages it was given.
///
/// # Examples
///
/// ```ignore
/// let client = MockLLMClient::new("Hello!");
/// let client = MockLLMClient::new("fallback").with_queue(["first", "second"]);
/// let client = MockLLMClient::failing();
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    default_response: String,
    queue: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<Vec<(String, String)>>>>,
    should_fail: bool,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Responses returned, in order, before the default one.
    pub fn with_queue<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue
            .lock()
            .extend(responses.into_iter().map(Into::into));
        self
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// Messages of every call made so far.
    pub fn calls(&self) -> Vec<Vec<(String, String)>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn respond(&self, messages: Vec<(String, String)>) -> Result<String> {
        self.calls.lock().push(messages);
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self
            .queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.respond(vec![
            ("system".to_string(), system.to_string()),
            ("user".to_string(), prompt.to_string()),
        ])
    }

    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
        self.respond(messages.to_vec())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
