//! Interactive terminal chat.

use crate::{
    agents::{Companion, TurnOutcome},
    cli::output::Output,
    memory::ConversationStore,
    ratelimit::RateLimiter,
    types::{AgentContext, AgentPreference, Message, Result},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use uuid::Uuid;

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    Message(String),
    SwitchAgent(String),
    Clear,
    Quit,
    Empty,
    Unknown(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Empty;
        }
        if !line.starts_with('/') {
            return ChatCommand::Message(line.to_string());
        }

        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match command.as_str() {
            "/quit" | "/exit" => ChatCommand::Quit,
            "/clear" => ChatCommand::Clear,
            "/agent" => ChatCommand::SwitchAgent(arg.to_string()),
            _ => ChatCommand::Unknown(command),
        }
    }
}

/// What happened in response to one line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Reply(TurnOutcome),
    Switched(AgentPreference),
    Cleared,
    RateLimited,
    Quit,
    Ignored,
    Invalid(String),
}

/// A single terminal conversation.
pub struct ChatSession<'a> {
    companion: &'a Companion,
    limiter: &'a RateLimiter,
    store: ConversationStore,
    session_id: String,
    username: String,
    preference: AgentPreference,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        companion: &'a Companion,
        limiter: &'a RateLimiter,
        username: impl Into<String>,
        preference: AgentPreference,
    ) -> Self {
        Self {
            companion,
            limiter,
            store: ConversationStore::new(),
            session_id: Uuid::new_v4().to_string(),
            username: username.into(),
            preference,
        }
    }

    pub fn preference(&self) -> AgentPreference {
        self.preference
    }

    pub fn history(&self) -> Vec<Message> {
        self.store.history(&self.session_id)
    }

    /// Handle one line of input.
    pub async fn handle(&mut self, line: &str) -> Result<ChatEvent> {
        match ChatCommand::parse(line) {
            ChatCommand::Empty => Ok(ChatEvent::Ignored),
            ChatCommand::Quit => Ok(ChatEvent::Quit),
            ChatCommand::Clear => {
                self.store.clear(&self.session_id);
                Ok(ChatEvent::Cleared)
            }
            ChatCommand::Unknown(command) => {
                Ok(ChatEvent::Invalid(format!("Unknown command {}", command)))
            }
            ChatCommand::SwitchAgent(name) => match name.parse::<AgentPreference>() {
                Ok(preference) => {
                    self.preference = preference;
                    Ok(ChatEvent::Switched(preference))
                }
                Err(e) => Ok(ChatEvent::Invalid(e.to_string())),
            },
            ChatCommand::Message(text) => {
                if !self.limiter.check_and_log(&self.username) {
                    return Ok(ChatEvent::RateLimited);
                }

                let context = AgentContext {
                    session_id: self.session_id.clone(),
                    username: self.username.clone(),
                    conversation_history: self.history(),
                };
                let outcome = self
                    .companion
                    .respond(&text, &context, self.preference)
                    .await?;

                self.store.record_turn(
                    &self.session_id,
                    Message::user(text),
                    Message::assistant(outcome.response.clone(), outcome.agent),
                );
                Ok(ChatEvent::Reply(outcome))
            }
        }
    }
}

fn describe(preference: AgentPreference) -> String {
    match preference {
        AgentPreference::Auto => "Auto (routing each message)".to_string(),
        AgentPreference::Agent(kind) => format!("{} Agent", kind.display_name()),
    }
}

/// Read lines from `input` until `/quit` or end of input.
pub async fn run<R>(mut session: ChatSession<'_>, input: R, output: &Output) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    output.banner();
    output.kv("agent", &describe(session.preference()));
    output.hint("/agent <auto|motivation|teaching> switches agents, /clear forgets, /quit leaves");
    output.newline();

    let mut lines = input.lines();
    loop {
        output.prompt(&session.username);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match session.handle(&line).await? {
            ChatEvent::Reply(outcome) => output.reply(outcome.agent, &outcome.response),
            ChatEvent::Switched(preference) => {
                output.success(&format!("Now talking to: {}", describe(preference)))
            }
            ChatEvent::Cleared => output.success("Conversation cleared"),
            ChatEvent::RateLimited => output.warning(
                "You have reached the request limit. Please wait a minute and try again.",
            ),
            ChatEvent::Invalid(message) => output.error(&message),
            ChatEvent::Ignored => {}
            ChatEvent::Quit => break,
        }
    }

    output.info("Bye! Keep up the great work.");
    Ok(())
}
