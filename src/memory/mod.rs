//! Conversation memory.
//!
//! This module provides utilities for:
//! - Windowing conversation history before it is handed to an agent
//! - Converting stored messages into `(role, content)` prompt pairs
//! - Keeping per-session history in memory for the HTTP API

use crate::agents::cleaning::clean_llm_response;
use crate::types::{AgentKind, Message, MessageRole};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Default number of recent messages handed to the answering agent.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Returns the last `window` messages of the history.
///
/// # Example
/// ```ignore
/// let recent = truncate_history(&history, 20);
/// assert!(recent.len() <= 20);
/// ```
pub fn truncate_history(history: &[Message], window: usize) -> Vec<Message> {
    let start = history.len().saturating_sub(window);
    history[start..].to_vec()
}

/// Converts messages into `(role, content)` pairs for an LLM prompt.
///
/// System messages are dropped and echoed agent labels are stripped from
/// the content.
pub fn to_prompt_pairs(messages: &[Message]) -> Vec<(String, String)> {
    messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| (m.role.as_str().to_string(), clean_llm_response(&m.content)))
        .collect()
}

/// Agent tag of the last message, if that message is an assistant reply.
pub fn last_assistant_agent(history: &[Message]) -> Option<AgentKind> {
    history
        .last()
        .filter(|m| m.role == MessageRole::Assistant)
        .and_then(|m| m.agent)
}

/// Sessions kept by [`ConversationStore::new`].
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// In-memory conversation history keyed by session id.
///
/// Holds at most `capacity` sessions. Reading or writing a session marks it
/// as recently used; the least recently used one is dropped to make room.
pub struct ConversationStore {
    sessions: Mutex<LruCache<String, Vec<Message>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    /// A store holding at most `capacity` sessions (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.sessions.lock().cap().get()
    }

    /// Full history of a session; empty if the session is unknown.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.get(session_id).unwrap_or_default()
    }

    /// History of a session, or `None` if it is not stored.
    pub fn get(&self, session_id: &str) -> Option<Vec<Message>> {
        self.sessions.lock().get(session_id).cloned()
    }

    pub fn append(&self, session_id: &str, message: Message) {
        self.push(session_id, [message]);
    }

    /// Records a user message and the reply to it in one write.
    pub fn record_turn(&self, session_id: &str, user: Message, assistant: Message) {
        self.push(session_id, [user, assistant]);
    }

    fn push<const N: usize>(&self, session_id: &str, messages: [Message; N]) {
        let mut sessions = self.sessions.lock();
        if let Some(history) = sessions.get_mut(session_id) {
            history.extend(messages);
            return;
        }

        if let Some((evicted, _)) = sessions.push(session_id.to_string(), Vec::from(messages)) {
            if evicted != session_id {
                tracing::debug!(session_id = %evicted, "Evicted least recently used session");
            }
        }
    }

    /// Removes a session. Returns `false` if it did not exist.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.lock().pop(session_id).is_some()
    }

    pub fn sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.lock().iter().map(|(k, _)| k.clone()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {}", i))
                } else {
                    Message::assistant(format!("answer {}", i), Some(AgentKind::Teaching))
                }
            })
            .collect()
    }

    #[test]
    fn test_truncate_history_keeps_most_recent() {
        let recent = truncate_history(&history(25), 20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].content, "answer 5");
        assert_eq!(recent[19].content, "question 24");
    }

    #[test]
    fn test_truncate_history_shorter_than_window() {
        assert_eq!(truncate_history(&history(3), 20).len(), 3);
        assert!(truncate_history(&[], 20).is_empty());
    }

    #[test]
    fn test_prompt_pairs_drop_system_and_clean_labels() {
        let messages = vec![
            Message {
                role: MessageRole::System,
                content: "ignored".to_string(),
                agent: None,
                timestamp: chrono::Utc::now(),
            },
            Message::user("What is a noun?"),
            Message::assistant(
                "Teaching Agent: A noun names a thing.",
                Some(AgentKind::Teaching),
            ),
        ];

        let pairs = to_prompt_pairs(&messages);
        assert_eq!(
            pairs,
            vec![
                ("user".to_string(), "What is a noun?".to_string()),
                ("assistant".to_string(), "A noun names a thing.".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_assistant_agent() {
        assert_eq!(
            last_assistant_agent(&history(2)),
            Some(AgentKind::Teaching)
        );
        // last message is a user turn
        assert_eq!(last_assistant_agent(&history(3)), None);
        assert_eq!(last_assistant_agent(&[]), None);
        assert_eq!(
            last_assistant_agent(&[Message::assistant("Oops!", None)]),
            None
        );
    }

    #[test]
    fn test_store_record_and_clear() {
        let store = ConversationStore::new();
        assert!(store.history("s1").is_empty());
        assert!(store.get("s1").is_none());

        store.record_turn(
            "s1",
            Message::user("hi"),
            Message::assistant("hello!", Some(AgentKind::Motivation)),
        );
        store.append("s2", Message::user("other"));

        let history = store.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].agent, Some(AgentKind::Motivation));
        assert_eq!(store.sessions(), vec!["s1".to_string(), "s2".to_string()]);

        assert!(store.clear("s1"));
        assert!(!store.clear("s1"));
        assert!(store.get("s1").is_none());
    }

    #[test]
    fn test_store_evicts_least_recently_used_session() {
        let store = ConversationStore::with_capacity(2);
        store.append("oldest", Message::user("one"));
        store.append("middle", Message::user("two"));

        // reading "oldest" makes "middle" the least recently used
        assert_eq!(store.history("oldest").len(), 1);
        store.append("newest", Message::user("three"));

        assert!(store.get("middle").is_none());
        assert_eq!(
            store.sessions(),
            vec!["newest".to_string(), "oldest".to_string()]
        );
    }

    #[test]
    fn test_store_capacity_has_a_floor() {
        assert_eq!(ConversationStore::with_capacity(0).capacity(), 1);
        assert_eq!(ConversationStore::new().capacity(), DEFAULT_MAX_SESSIONS);
    }
}
