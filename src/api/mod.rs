//! HTTP API Handlers and Routes
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Chat (`/api/chat`)
//! - `POST /api/chat` - Send a message and receive the companion's reply
//!
//! ## Conversations (`/api/conversations`)
//! - `GET /api/conversations/{id}` - Get the messages of a session
//! - `DELETE /api/conversations/{id}` - Forget a session
//!
//! ## Agents (`/api/agents`)
//! - `GET /api/agents` - List the personas that can answer
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! There is no authentication. The optional `username` on a chat request is
//! used only as the rate limiting key.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
