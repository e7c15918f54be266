//! Chat Session Core - binds one stream's chat to one transport connection.
//!
//! ```text
//!   connect(stream) ──► subscribe() ──► transport.connect() ──► epoch N
//!                            │
//!   TransportEvent{epoch, event} ──► keep epoch N ──► keep type "message"
//!                            │
//!                            ▼
//!                      ChatMessage stream (own-message flag applied)
//! ```
//!
//! The core subscribes before connecting so nothing the server sends right
//! after the handshake is missed. Every subscription is pinned to the epoch
//! its connect produced; frames from superseded sockets are invisible to it.

use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch, Mutex};

use crate::domain::chat::{encode, ChatMessage, CodecError, ConnectionState, OutboundWireEvent};
use crate::domain::foundation::{StreamId, UserId};
use crate::ports::{ChatTransport, ConnectionEpoch, CredentialProvider, TransportError, TransportEvent};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat connection failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Chat message could not be encoded: {0}")]
    Codec(#[from] CodecError),
}

// ============================================================================
// Subscription
// ============================================================================

/// What a caller observes after a successful connect.
pub struct ChatSubscription {
    /// The connection this subscription is pinned to.
    pub epoch: ConnectionEpoch,
    /// Chat messages of this connection, in arrival order. Not restartable.
    pub messages: BoxStream<'static, ChatMessage>,
    /// Latest connection state of the transport.
    pub state: watch::Receiver<ConnectionState>,
}

impl std::fmt::Debug for ChatSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSubscription")
            .field("epoch", &self.epoch)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct ActiveChat {
    stream_id: StreamId,
    epoch: ConnectionEpoch,
}

// ============================================================================
// Core
// ============================================================================

/// Owns the chat transport on behalf of the presentation layer.
pub struct ChatSessionCore {
    transport: Arc<dyn ChatTransport>,
    credentials: Arc<dyn CredentialProvider>,
    active: Mutex<Option<ActiveChat>>,
}

impl ChatSessionCore {
    pub fn new(transport: Arc<dyn ChatTransport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            credentials,
            active: Mutex::new(None),
        }
    }

    /// Connects to a stream's chat as the stored viewer.
    pub async fn connect(&self, stream_id: &StreamId) -> Result<ChatSubscription, ChatError> {
        let identity = self.credentials.user_id();
        self.connect_as(stream_id, identity).await
    }

    /// Connects to a stream's chat, attributing messages to `identity`.
    ///
    /// Any previous connection is closed first, even for the same stream.
    pub async fn connect_as(
        &self,
        stream_id: &StreamId,
        identity: Option<UserId>,
    ) -> Result<ChatSubscription, ChatError> {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            if previous.stream_id != *stream_id {
                tracing::info!(
                    previous = %previous.stream_id,
                    next = %stream_id,
                    "Switching chat to another stream"
                );
            }
        }

        let token = self.credentials.auth_token().unwrap_or_default();
        if token.is_empty() {
            tracing::debug!(stream_id = %stream_id, "Connecting to chat without a token");
        }

        let events = self.transport.subscribe();
        let state = self.transport.state();

        let epoch = self.transport.connect(stream_id, &token).await.map_err(|e| {
            tracing::warn!(stream_id = %stream_id, error = %e, "Chat connect failed");
            e
        })?;

        *active = Some(ActiveChat {
            stream_id: stream_id.clone(),
            epoch,
        });
        tracing::info!(stream_id = %stream_id, epoch = %epoch, "Chat connected");

        Ok(ChatSubscription {
            epoch,
            messages: chat_messages(events, epoch, identity),
            state,
        })
    }

    /// Sends a chat message on the current connection.
    ///
    /// Content goes out exactly as given. Dropped silently when not connected.
    pub fn send_message(&self, content: &str) -> Result<(), ChatError> {
        let frame = encode(&OutboundWireEvent::send_message(content))?;
        self.transport.send(frame);
        Ok(())
    }

    /// Closes the current connection, if any.
    pub async fn disconnect(&self) {
        let mut active = self.active.lock().await;
        self.transport.disconnect().await;
        if let Some(previous) = active.take() {
            tracing::info!(stream_id = %previous.stream_id, epoch = %previous.epoch, "Chat disconnected");
        }
    }

    /// Closes the connection only if it is still the one `epoch` names.
    ///
    /// Returns whether anything was closed. A newer session started by
    /// another caller is left untouched.
    pub async fn disconnect_epoch(&self, epoch: ConnectionEpoch) -> bool {
        let mut active = self.active.lock().await;
        match active.as_ref() {
            Some(current) if current.epoch == epoch => {}
            _ => {
                tracing::debug!(epoch = %epoch, "Chat session already superseded; nothing to close");
                return false;
            }
        }
        self.transport.disconnect().await;
        if let Some(previous) = active.take() {
            tracing::info!(stream_id = %previous.stream_id, epoch = %previous.epoch, "Chat disconnected");
        }
        true
    }

    /// The stream currently bound to the connection.
    pub async fn active_stream(&self) -> Option<StreamId> {
        self.active.lock().await.as_ref().map(|a| a.stream_id.clone())
    }
}

fn chat_messages(
    events: broadcast::Receiver<TransportEvent>,
    epoch: ConnectionEpoch,
    identity: Option<UserId>,
) -> BoxStream<'static, ChatMessage> {
    stream::unfold((events, identity), move |(mut events, identity)| async move {
        loop {
            match events.recv().await {
                Ok(TransportEvent { epoch: tagged, event }) => {
                    if tagged != epoch {
                        continue;
                    }
                    if let Some(message) = event.into_chat_message(identity.as_ref()) {
                        return Some((message, (events, identity)));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, epoch = %epoch, "Chat subscriber fell behind; oldest messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}
