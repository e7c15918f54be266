//! In-memory chat transport for testing.
//!
//! Implements the same epoch and state rules as the WebSocket transport
//! without any network I/O, and records what the client did so tests can
//! assert on it.
//!
//! # Example
//!
//! ```ignore
//! let transport = Arc::new(InMemoryChatTransport::new());
//! let epoch = transport.connect(&stream_id, "token").await?;
//!
//! // Simulate the server
//! transport.receive_raw(r#"{"type":"message","id":"1"}"#);
//!
//! // Assert in tests
//! assert_eq!(transport.sent_frames(), vec![r#"{"type":"send_message","content":"hi"}"#]);
//! ```

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{broadcast, watch};

use crate::config::MIN_EVENT_BUFFER_CAPACITY;
use crate::domain::chat::{wire, ConnectionState};
use crate::domain::foundation::StreamId;
use crate::ports::{ChatTransport, ConnectionEpoch, TransportError, TransportEvent};

/// A `connect` call as seen by the fake server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectCall {
    pub stream_id: StreamId,
    pub token: String,
    pub epoch: ConnectionEpoch,
}

#[derive(Default)]
struct Inner {
    epoch: ConnectionEpoch,
    open: Option<(StreamId, ConnectionEpoch)>,
    refuse_connections: bool,
    connect_calls: Vec<ConnectCall>,
    sent_frames: Vec<String>,
    close_count: usize,
}

/// Network-free [`ChatTransport`].
pub struct InMemoryChatTransport {
    inner: Mutex<Inner>,
    events: broadcast::Sender<TransportEvent>,
    state: watch::Sender<ConnectionState>,
}

impl InMemoryChatTransport {
    /// Creates a transport with the minimum buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(MIN_EVENT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
            state,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: ConnectionState) {
        self.state.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    // === Server simulation ===

    /// Makes subsequent `connect` calls fail the handshake.
    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse_connections = refuse;
    }

    /// Delivers a raw text frame on the open socket.
    ///
    /// Malformed frames are dropped like the real transport drops them.
    /// Returns false when nothing was published.
    pub fn receive_raw(&self, text: &str) -> bool {
        let inner = self.lock();
        let Some((_, epoch)) = inner.open.as_ref() else {
            return false;
        };
        match wire::decode(text) {
            Ok(event) => {
                let _ = self.events.send(TransportEvent {
                    epoch: *epoch,
                    event,
                });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed chat frame");
                false
            }
        }
    }

    /// Publishes an event with an arbitrary epoch, bypassing the epoch guard.
    ///
    /// Simulates a frame from a superseded socket that slipped through.
    pub fn inject(&self, event: TransportEvent) {
        let _ = self.events.send(event);
    }

    /// Simulates a network failure on the open socket.
    pub fn fail(&self) {
        let mut inner = self.lock();
        if inner.open.take().is_some() {
            self.set_state(ConnectionState::Error);
        }
    }

    /// Simulates the server closing the socket.
    pub fn close_from_server(&self) {
        let mut inner = self.lock();
        if inner.open.take().is_some() {
            self.set_state(ConnectionState::Disconnected);
        }
    }

    // === Test Helpers ===

    pub fn connect_calls(&self) -> Vec<ConnectCall> {
        self.lock().connect_calls.clone()
    }

    pub fn sent_frames(&self) -> Vec<String> {
        self.lock().sent_frames.clone()
    }

    /// The stream of the open socket, if any.
    pub fn open_stream(&self) -> Option<StreamId> {
        self.lock().open.as_ref().map(|(stream, _)| stream.clone())
    }

    /// Number of sockets closed by the client (superseded or disconnected).
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    pub fn current_epoch(&self) -> ConnectionEpoch {
        self.lock().epoch
    }
}

impl Default for InMemoryChatTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for InMemoryChatTransport {
    async fn connect(
        &self,
        stream_id: &StreamId,
        token: &str,
    ) -> Result<ConnectionEpoch, TransportError> {
        let mut inner = self.lock();
        inner.epoch = inner.epoch.next();
        if inner.open.take().is_some() {
            inner.close_count += 1;
        }
        self.set_state(ConnectionState::Disconnected);

        let epoch = inner.epoch;
        inner.connect_calls.push(ConnectCall {
            stream_id: stream_id.clone(),
            token: token.to_string(),
            epoch,
        });

        if inner.refuse_connections {
            self.set_state(ConnectionState::Error);
            return Err(TransportError::Handshake("connection refused".to_string()));
        }

        inner.open = Some((stream_id.clone(), epoch));
        self.set_state(ConnectionState::Connected);
        Ok(epoch)
    }

    fn send(&self, payload: String) {
        let mut inner = self.lock();
        if inner.open.is_some() {
            inner.sent_frames.push(payload);
        }
    }

    async fn disconnect(&self) {
        let mut inner = self.lock();
        inner.epoch = inner.epoch.next();
        if inner.open.take().is_some() {
            inner.close_count += 1;
        }
        self.set_state(ConnectionState::Disconnected);
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }

    fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }
}
