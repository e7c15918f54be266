//! WebSocket adapters for the live chat.
//!
//! # Components
//!
//! - [`transport`] - tokio-tungstenite implementation of [`ChatTransport`]
//! - [`in_memory`] - network-free implementation for tests
//!
//! [`ChatTransport`]: crate::ports::ChatTransport

pub mod in_memory;
pub mod transport;

pub use in_memory::{ConnectCall, InMemoryChatTransport};
pub use transport::{chat_endpoint, WebSocketChatTransport, CLIENT_CLOSED_REASON, SUPERSEDED_REASON};
