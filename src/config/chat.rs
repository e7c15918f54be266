//! Chat transport configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Smallest inbound buffer accepted; a slow consumer must not stall the socket reader.
pub const MIN_EVENT_BUFFER_CAPACITY: usize = 64;

/// Chat (WebSocket) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Scheme and authority of the chat server, e.g. `ws://10.0.2.2:8080`
    #[serde(default = "default_ws_base_url")]
    pub ws_base_url: String,

    /// Pending inbound events kept per subscriber before the oldest are dropped
    #[serde(default = "default_event_buffer_capacity")]
    pub event_buffer_capacity: usize,

    /// WebSocket handshake timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ChatConfig {
    /// Get handshake timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.ws_base_url.starts_with("ws://") && !self.ws_base_url.starts_with("wss://") {
            return Err(ValidationError::InvalidWebSocketUrl);
        }
        if self.event_buffer_capacity < MIN_EVENT_BUFFER_CAPACITY {
            return Err(ValidationError::BufferTooSmall {
                min: MIN_EVENT_BUFFER_CAPACITY,
            });
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            ws_base_url: default_ws_base_url(),
            event_buffer_capacity: default_event_buffer_capacity(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_ws_base_url() -> String {
    "ws://10.0.2.2:8080".to_string()
}

fn default_event_buffer_capacity() -> usize {
    MIN_EVENT_BUFFER_CAPACITY
}

fn default_connect_timeout() -> u64 {
    10
}
