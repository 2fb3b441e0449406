#![allow(dead_code)]

pub mod mocks;

use mocks::MockLLMClient;
use study_companion::{
    agents::{Companion, MotivationAgent, RouterAgent, TeachingAgent},
    types::{AgentContext, AgentKind, Message},
    utils::toml_config::CompanionConfig,
};

/// Mocks handed to a companion, kept so tests can inspect the calls.
pub struct Harness {
    pub motivation: MockLLMClient,
    pub teaching: MockLLMClient,
    pub router: MockLLMClient,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            motivation: MockLLMClient::new("You can do this!"),
            teaching: MockLLMClient::new("Here is a simple explanation."),
            router: MockLLMClient::new("motivation"),
        }
    }

    pub fn companion(&self) -> Companion {
        Companion::new(
            Box::new(MotivationAgent::new(Box::new(self.motivation.clone()))),
            Box::new(TeachingAgent::new(Box::new(self.teaching.clone()))),
            RouterAgent::new(Box::new(self.router.clone())),
        )
    }
}

pub fn context(history: Vec<Message>) -> AgentContext {
    AgentContext {
        session_id: "test-session".to_string(),
        username: "tester".to_string(),
        conversation_history: history,
    }
}

/// Alternating user/assistant history of `n` messages, assistant turns tagged `agent`.
pub fn history(n: usize, agent: AgentKind) -> Vec<Message> {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                Message::user(format!("question {}", i))
            } else {
                Message::assistant(format!("answer {}", i), Some(agent))
            }
        })
        .collect()
}

pub fn test_config() -> CompanionConfig {
    toml::from_str(
        r#"
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
[agents.router]
model = "default"
"#,
    )
    .expect("test config parses")
}
