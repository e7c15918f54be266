//! Connection state of a chat transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state of the chat socket.
///
/// Only the transport moves between states:
///
/// ```text
/// Disconnected ──open──▶ Connected
/// Connected | Disconnected ──failure──▶ Error
/// Connected | Error ──close──▶ Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Error,
}

impl ConnectionState {
    /// Returns true only for `Connected`.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        };
        write!(f, "{}", s)
    }
}
