//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the client core and the outside world. Adapters implement these ports.
//!
//! ## Real-time
//!
//! - `ChatTransport` - One live chat socket, its events and its state
//!
//! ## Request/response
//!
//! - `StreamDirectory` - Stream listing and lifecycle calls
//! - `AuthGateway` - Login and registration
//!
//! ## Credentials
//!
//! - `CredentialProvider` / `CredentialStore` - Current token and viewer id

mod auth_gateway;
mod chat_transport;
mod credential_provider;
mod stream_directory;

pub use auth_gateway::AuthGateway;
pub use chat_transport::{ChatTransport, ConnectionEpoch, TransportError, TransportEvent};
pub use credential_provider::{CredentialProvider, CredentialStore};
pub use stream_directory::StreamDirectory;
