//! Persona agents, the intent router and the turn orchestrator.

pub mod cleaning;
pub mod keywords;
pub mod motivation;
pub mod orchestrator;
pub mod router;
pub mod teaching;

use crate::types::{AgentContext, AgentKind, Result};
use async_trait::async_trait;

// Re-export commonly used types
pub use motivation::MotivationAgent;
pub use orchestrator::{Companion, TurnOutcome};
pub use router::RouterAgent;
pub use teaching::TeachingAgent;

/// Base trait for the persona agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute the agent with given input and context
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String>;

    /// Get the agent's system prompt
    fn system_prompt(&self) -> String;

    /// Which persona this is
    fn kind(&self) -> AgentKind;
}
