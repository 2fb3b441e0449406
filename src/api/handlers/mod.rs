//! API request handlers.

/// Agent listing handler.
pub mod agents;
/// Chat turn handler.
pub mod chat;
/// Conversation lookup and deletion handlers.
pub mod conversations;
/// Health check handler.
pub mod health;
