use crate::{
    agents::keywords::{has_follow_up, has_teaching_keyword},
    llm::LLMClient,
    memory::{last_assistant_agent, to_prompt_pairs, truncate_history},
    types::{AgentContext, AgentKind, Message, Result},
};

const ROUTER_PROMPT: &str = r#"Your job is to act as a router. Based on the latest user prompt and the preceding conversation history, you must determine if the primary intent is 'teaching' or 'motivation'.
The 'teaching' intent takes priority if the user is asking about an academic concept, even if they express frustration. A follow-up like "another example" after a teaching response is a 'teaching' intent.

--- EXAMPLES ---
History: [User: "What is photosynthesis?"]
New User Prompt: "Can you explain it differently?" -> teaching

History: [User: "I'm so lost on this homework."]
New User Prompt: "I don't think I can do it." -> motivation

History: [User: "Explain Trigonometry", Assistant: "Okay, SOH CAH TOA..."]
New User Prompt: "Give me another example." -> teaching
---

Based on the conversation history and the NEW user prompt below, respond with ONLY one word: 'teaching' or 'motivation'."#;

/// Default number of history messages shown to the routing model.
pub const DEFAULT_ROUTER_HISTORY_WINDOW: usize = 6;

/// Router agent that picks the persona for a turn.
///
/// Keyword heuristics decide most turns. Only when they are inconclusive is
/// the LLM asked, so the client handed in here should run at temperature 0.
pub struct RouterAgent {
    llm: Box<dyn LLMClient>,
    history_window: usize,
    system_prompt: String,
}

impl RouterAgent {
    /// Creates a new RouterAgent with the given LLM client.
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self {
            llm,
            history_window: DEFAULT_ROUTER_HISTORY_WINDOW,
            system_prompt: ROUTER_PROMPT.to_string(),
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Keyword-only routing. `None` means the LLM has to decide.
    ///
    /// A follow-up phrase only counts when the previous reply came from the
    /// Teaching agent; a word close to a teaching keyword always does.
    pub fn heuristic_route(input: &str, history: &[Message]) -> Option<AgentKind> {
        let lower_input = input.to_lowercase();
        let last_was_teaching = last_assistant_agent(history) == Some(AgentKind::Teaching);

        if last_was_teaching && has_follow_up(&lower_input) {
            return Some(AgentKind::Teaching);
        }

        if has_teaching_keyword(&lower_input) {
            return Some(AgentKind::Teaching);
        }

        None
    }

    /// Parse routing decision from LLM output
    ///
    /// Any output mentioning "teaching" routes to Teaching, so both a clean
    /// "teaching" and chatty "I'd say teaching." are accepted. Everything else
    /// goes to Motivation.
    pub fn parse_routing_decision(output: &str) -> AgentKind {
        if output.trim().to_lowercase().contains("teaching") {
            AgentKind::Teaching
        } else {
            AgentKind::Motivation
        }
    }

    /// Routes a message to the persona that should answer it.
    pub async fn route(&self, input: &str, context: &AgentContext) -> Result<AgentKind> {
        let history = &context.conversation_history;

        if let Some(kind) = Self::heuristic_route(input, history) {
            tracing::debug!(agent = %kind, "Routed by keyword");
            return Ok(kind);
        }

        let mut messages = vec![("system".to_string(), self.system_prompt.clone())];
        messages.extend(to_prompt_pairs(&truncate_history(
            history,
            self.history_window,
        )));
        messages.push(("user".to_string(), input.to_string()));

        let decision = self.llm.generate_with_history(&messages).await?;
        let kind = Self::parse_routing_decision(&decision);

        tracing::debug!(decision = %decision.trim(), agent = %kind, "Routed by model");
        Ok(kind)
    }
}
