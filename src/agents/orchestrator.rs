//! One chat turn: pick a persona, hand it the windowed history, clean the reply.

use crate::{
    agents::{cleaning::clean_llm_response, Agent, MotivationAgent, RouterAgent, TeachingAgent},
    llm::{Provider, ProviderRegistry},
    memory::{truncate_history, DEFAULT_HISTORY_WINDOW},
    types::{AgentContext, AgentKind, AgentPreference, AppError, Result},
    utils::toml_config::CompanionConfig,
};

/// Reply shown when the chosen agent fails.
pub const AGENT_ERROR_REPLY: &str =
    "Oops! I had trouble getting a response from that agent. Please try again or rephrase.";

/// Label reported for a turn whose agent failed.
pub const ERROR_LABEL: &str = "Error";

/// Result of a single turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub response: String,
    /// Agent that answered; `None` when it failed and the apology was returned
    pub agent: Option<AgentKind>,
}

impl TurnOutcome {
    /// Display name of the answering agent, or `"Error"`.
    pub fn agent_label(&self) -> &'static str {
        self.agent.map(|k| k.display_name()).unwrap_or(ERROR_LABEL)
    }
}

/// Provider for the router's model, pinned to temperature 0.
pub fn router_provider(config: &CompanionConfig, registry: &ProviderRegistry) -> Result<Provider> {
    Ok(registry
        .provider_for_model(&config.agents.router.model)?
        .with_temperature(0.0))
}

/// Both personas plus the router that chooses between them.
pub struct Companion {
    motivation: Box<dyn Agent>,
    teaching: Box<dyn Agent>,
    router: RouterAgent,
    history_window: usize,
}

impl Companion {
    pub fn new(motivation: Box<dyn Agent>, teaching: Box<dyn Agent>, router: RouterAgent) -> Self {
        Self {
            motivation,
            teaching,
            router,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Build the agents from configuration, creating one client per agent.
    ///
    /// The router's client always runs at temperature 0.
    pub async fn from_config(config: &CompanionConfig, registry: &ProviderRegistry) -> Result<Self> {
        let agents = &config.agents;

        let mut motivation =
            MotivationAgent::new(registry.create_client_for_model(&agents.motivation.model).await?);
        if let Some(prompt) = &agents.motivation.system_prompt {
            motivation = motivation.with_system_prompt(prompt.clone());
        }

        let mut teaching =
            TeachingAgent::new(registry.create_client_for_model(&agents.teaching.model).await?);
        if let Some(prompt) = &agents.teaching.system_prompt {
            teaching = teaching.with_system_prompt(prompt.clone());
        }

        let router_client = router_provider(config, registry)?.create_client().await?;
        let mut router = RouterAgent::new(router_client)
            .with_history_window(config.chat.router_history_window);
        if let Some(prompt) = &agents.router.system_prompt {
            router = router.with_system_prompt(prompt.clone());
        }

        tracing::info!(
            motivation = %agents.motivation.model,
            teaching = %agents.teaching.model,
            router = %agents.router.model,
            "Companion agents ready"
        );

        Ok(Self::new(Box::new(motivation), Box::new(teaching), router)
            .with_history_window(config.chat.history_window))
    }

    pub fn agent(&self, kind: AgentKind) -> &dyn Agent {
        match kind {
            AgentKind::Motivation => self.motivation.as_ref(),
            AgentKind::Teaching => self.teaching.as_ref(),
        }
    }

    pub fn router(&self) -> &RouterAgent {
        &self.router
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Pick the agent for this turn. Routing errors fall back to Motivation.
    async fn choose(&self, input: &str, context: &AgentContext, preference: AgentPreference) -> AgentKind {
        match preference {
            AgentPreference::Agent(kind) => kind,
            AgentPreference::Auto => match self.router.route(input, context).await {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::warn!(error = %e, "Routing failed, falling back to motivation");
                    AgentKind::Motivation
                }
            },
        }
    }

    /// Answer one user message.
    ///
    /// `context.conversation_history` is the full history before this message.
    /// Only agent failures are turned into the apology reply; blank input is
    /// rejected with `InvalidInput`.
    pub async fn respond(
        &self,
        input: &str,
        context: &AgentContext,
        preference: AgentPreference,
    ) -> Result<TurnOutcome> {
        if input.trim().is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }

        let kind = self.choose(input, context, preference).await;

        let agent_context = AgentContext {
            session_id: context.session_id.clone(),
            username: context.username.clone(),
            conversation_history: truncate_history(
                &context.conversation_history,
                self.history_window,
            ),
        };

        match self.agent(kind).execute(input, &agent_context).await {
            Ok(response) => {
                tracing::info!(
                    session_id = %context.session_id,
                    agent = %kind,
                    "Agent responded"
                );
                Ok(TurnOutcome {
                    response: clean_llm_response(&response),
                    agent: Some(kind),
                })
            }
            Err(e) => {
                tracing::error!(
                    session_id = %context.session_id,
                    agent = %kind,
                    error = %e,
                    "Error invoking agent"
                );
                Ok(TurnOutcome {
                    response: AGENT_ERROR_REPLY.to_string(),
                    agent: None,
                })
            }
        }
    }
}
