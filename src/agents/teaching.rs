use crate::{
    agents::Agent,
    llm::LLMClient,
    memory::to_prompt_pairs,
    types::{AgentContext, AgentKind, Result},
};
use async_trait::async_trait;

const TEACHING_PERSONA: &str = r#"You are the "Teaching Agent" for an ADHD Study Group.
Your core purpose is to explain academic concepts and answer questions in a clear, patient,
and highly simplified manner, specifically tailored for K-12 students with ADHD.
You have access to the full chat history for context and to build on previous explanations.

Your responses should always:
- Break down complex topics into small, digestible chunks.
- Use simple, everyday language and avoid jargon.
- Employ analogies, metaphors, or relatable examples to aid understanding.
- Check for understanding where appropriate (e.g., "Does that make sense?").
- Be concise, but thorough enough to convey the core idea.
- Maintain a calm, encouraging, and supportive tone.
- Focus purely on education and explanation. Do NOT offer motivation, tasks, or emotional support beyond a generally kind demeanor.
- Refer to previous parts of the conversation if the user is building on a topic or asking follow-up questions.
- When asked about past interactions or topics, use the provided chat history to recall or summarize what was discussed. Do NOT claim to lack memory or state that interactions start fresh."#;

/// Explanation persona. Sees the windowed conversation history before the new message.
pub struct TeachingAgent {
    llm: Box<dyn LLMClient>,
    system_prompt: String,
}

impl TeachingAgent {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self {
            llm,
            system_prompt: TEACHING_PERSONA.to_string(),
        }
    }

    /// Replace the built-in persona prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

#[async_trait]
impl Agent for TeachingAgent {
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String> {
        let mut messages = vec![("system".to_string(), self.system_prompt.clone())];
        messages.extend(to_prompt_pairs(&context.conversation_history));
        messages.push(("user".to_string(), input.to_string()));

        self.llm.generate_with_history(&messages).await
    }

    fn system_prompt(&self) -> String {
        self.system_prompt.clone()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Teaching
    }
}
