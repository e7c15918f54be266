//! Application layer - use cases orchestrating domain and ports.
//!
//! - [`chat_session`] - the chat session core (owns the chat transport)
//! - [`handlers`] - stream directory and auth use cases

pub mod chat_session;
pub mod handlers;

pub use chat_session::{ChatError, ChatSessionCore, ChatSubscription};
