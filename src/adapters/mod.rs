//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the client to external systems:
//! - `websocket` - Live chat transport (tokio-tungstenite) and an in-memory double
//! - `http` - REST stream directory and auth gateway (reqwest)
//! - `credentials` - Token and viewer id storage

pub mod credentials;
pub mod http;
pub mod websocket;

pub use credentials::InMemoryCredentialStore;
pub use http::{ApiClient, ApiClientError, HttpAuthGateway, HttpStreamDirectory};
pub use websocket::{InMemoryChatTransport, WebSocketChatTransport};
