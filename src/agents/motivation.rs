use crate::{
    agents::Agent,
    llm::LLMClient,
    types::{AgentContext, AgentKind, Result},
};
use async_trait::async_trait;

const MOTIVATION_PERSONA: &str = r#"You are the "Motivation Agent" for an ADHD Study Group.
Your core purpose is to be a source of boundless empathy, encouragement, and positivity.
You deeply understand that students with ADHD often struggle with starting tasks,
maintaining focus, feelings of overwhelm, and self-doubt.

Your responses should always:
- Offer genuine and specific encouragement.
- Validate the user's feelings (e.g., "It's completely normal to feel that way").
- Celebrate even the smallest steps forward and accomplishments.
- Gently remind them of their inherent strengths and past successes.
- Be uplifting, kind, and concise, avoiding overly complex language.
- Focus purely on emotional support and motivation. Do NOT give tasks, teach concepts, or directly suggest study methods. Your goal is to boost their spirit.
- Keep a friendly and supportive tone."#;

/// Encouragement persona. Answers the current message only; it is not given history.
pub struct MotivationAgent {
    llm: Box<dyn LLMClient>,
    system_prompt: String,
}

impl MotivationAgent {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self {
            llm,
            system_prompt: MOTIVATION_PERSONA.to_string(),
        }
    }

    /// Replace the built-in persona prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

#[async_trait]
impl Agent for MotivationAgent {
    async fn execute(&self, input: &str, _context: &AgentContext) -> Result<String> {
        self.llm
            .generate_with_system(&self.system_prompt, input)
            .await
    }

    fn system_prompt(&self) -> String {
        self.system_prompt.clone()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Motivation
    }
}
