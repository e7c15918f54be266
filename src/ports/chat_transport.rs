//! Chat transport port - one live socket to a stream's chat endpoint.
//!
//! The transport turns socket callbacks (open, text frame, close, failure)
//! into two outputs:
//!
//! - a hot, multi-subscriber sequence of decoded [`TransportEvent`]s
//! - a state channel that always holds the latest [`ConnectionState`]
//!
//! Every `connect` mints a fresh [`ConnectionEpoch`] and every `disconnect`
//! retires it. Events carry the epoch of the socket that received them, so a
//! subscriber bound to one connection can discard anything a superseded
//! socket produced.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::domain::chat::{ConnectionState, InboundWireEvent};
use crate::domain::foundation::StreamId;

/// Generation token of a transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConnectionEpoch(u64);

impl ConnectionEpoch {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The epoch minted after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded inbound frame tagged with the connection that received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub epoch: ConnectionEpoch,
    pub event: InboundWireEvent,
}

/// Errors raised while opening a connection.
///
/// Failures after the socket is open are reported through the state channel,
/// never as errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid chat endpoint: {0}")]
    InvalidUrl(String),

    #[error("Connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),
}

/// Owns at most one live chat socket.
///
/// # Contract
///
/// Implementations must:
/// - close any existing socket before opening a new one, serialized against
///   other `connect`/`disconnect` calls so two sockets are never live at once
/// - emit `Connected` on open and `Error` when the handshake fails
/// - drop `send` payloads silently when no socket is open
/// - make `disconnect` a no-op when already disconnected
/// - decode frames and drop malformed ones without touching the state
/// - never publish an event or change state on behalf of a retired epoch
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Opens a socket to `stream_id`'s chat, superseding any current socket.
    async fn connect(
        &self,
        stream_id: &StreamId,
        token: &str,
    ) -> Result<ConnectionEpoch, TransportError>;

    /// Forwards a raw text payload over the open socket, if any.
    fn send(&self, payload: String);

    /// Closes the open socket, if any, and emits `Disconnected`.
    async fn disconnect(&self);

    /// Subscribes to inbound events. Late subscribers miss past events.
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent>;

    /// Observes the connection state.
    fn state(&self) -> watch::Receiver<ConnectionState>;
}
