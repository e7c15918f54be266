//! WebSocket chat transport over tokio-tungstenite.
//!
//! # Lifecycle
//!
//! ```text
//! connect(stream, token)
//!   │  lifecycle lock held for the whole call
//!   ├── retire current socket (close 1000 "superseded", epoch += 1)
//!   ├── handshake with ws(s)://<host>/ws/chat/<stream>?token=<token>
//!   └── spawn reader + writer, publish Connected
//!
//! reader task ──decode──▶ publish(epoch, event) ──▶ broadcast ──▶ subscribers
//! writer task ◀── mpsc ◀── send(payload)
//! ```
//!
//! `publish` and every state change re-check the epoch under the same mutex
//! that `retire` bumps it under, so once a socket is retired its reader can
//! neither deliver another event nor move the state.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::{ChatConfig, MIN_EVENT_BUFFER_CAPACITY};
use crate::domain::chat::{wire, ConnectionState, InboundWireEvent};
use crate::domain::foundation::StreamId;
use crate::ports::{ChatTransport, ConnectionEpoch, TransportError, TransportEvent};

/// Close reason sent when a new `connect` replaces the open socket.
pub const SUPERSEDED_REASON: &str = "superseded";

/// Close reason sent on an explicit `disconnect`.
pub const CLIENT_CLOSED_REASON: &str = "client closed";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The socket currently owned by the transport.
struct ActiveSocket {
    epoch: ConnectionEpoch,
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
}

struct Inner {
    epoch: ConnectionEpoch,
    active: Option<ActiveSocket>,
}

/// State shared with the socket tasks.
struct Shared {
    inner: Mutex<Inner>,
    events: broadcast::Sender<TransportEvent>,
    state: watch::Sender<ConnectionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publishes an event if `epoch` is still the live connection.
    fn publish(&self, epoch: ConnectionEpoch, event: InboundWireEvent) -> bool {
        let inner = self.lock();
        if inner.epoch != epoch {
            return false;
        }
        // No subscribers is fine: the stream is hot.
        let _ = self.events.send(TransportEvent { epoch, event });
        true
    }

    /// Ends the connection from the socket side (peer close or failure).
    fn finish(&self, epoch: ConnectionEpoch, state: ConnectionState) {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return;
        }
        inner.active = None;
        set_state(&self.state, state);
    }
}

fn set_state(tx: &watch::Sender<ConnectionState>, next: ConnectionState) {
    tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

/// [`ChatTransport`] backed by a real WebSocket.
pub struct WebSocketChatTransport {
    ws_base_url: String,
    connect_timeout: Duration,
    /// Serializes connect/disconnect so close-before-open is atomic.
    lifecycle: tokio::sync::Mutex<()>,
    shared: Arc<Shared>,
}

impl WebSocketChatTransport {
    /// Creates a disconnected transport.
    pub fn new(config: &ChatConfig) -> Self {
        let capacity = config.event_buffer_capacity.max(MIN_EVENT_BUFFER_CAPACITY);
        let (events, _) = broadcast::channel(capacity);
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            ws_base_url: config.ws_base_url.clone(),
            connect_timeout: config.connect_timeout(),
            lifecycle: tokio::sync::Mutex::new(()),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    epoch: ConnectionEpoch::default(),
                    active: None,
                }),
                events,
                state,
            }),
        }
    }

    /// Retires the current epoch, closing its socket if one is open.
    ///
    /// Returns the new epoch.
    fn retire(&self, reason: &'static str) -> ConnectionEpoch {
        let (epoch, previous) = {
            let mut inner = self.shared.lock();
            inner.epoch = inner.epoch.next();
            let previous = inner.active.take();
            set_state(&self.shared.state, ConnectionState::Disconnected);
            (inner.epoch, previous)
        };

        if let Some(socket) = previous {
            tracing::debug!(epoch = %socket.epoch, reason, "Closing chat socket");
            close_socket(socket, reason);
        }

        epoch
    }
}

fn close_socket(socket: ActiveSocket, reason: &'static str) {
    let _ = socket.outbound.send(Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: reason.into(),
    })));
    socket.reader.abort();
}

/// Builds `<base>/ws/chat/<stream_id>?token=<token>`.
pub fn chat_endpoint(base: &str, stream_id: &StreamId, token: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
    if url.scheme() != "ws" && url.scheme() != "wss" {
        return Err(TransportError::InvalidUrl(format!(
            "URL must use ws:// or wss:// scheme, got: {}",
            url.scheme()
        )));
    }

    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(["ws", "chat", stream_id.as_str()]);
    url.query_pairs_mut().append_pair("token", token);

    Ok(url)
}

#[async_trait::async_trait]
impl ChatTransport for WebSocketChatTransport {
    async fn connect(
        &self,
        stream_id: &StreamId,
        token: &str,
    ) -> Result<ConnectionEpoch, TransportError> {
        let _lifecycle = self.lifecycle.lock().await;
        let epoch = self.retire(SUPERSEDED_REASON);

        let url = match chat_endpoint(&self.ws_base_url, stream_id, token) {
            Ok(url) => url,
            Err(e) => {
                self.shared.finish(epoch, ConnectionState::Error);
                return Err(e);
            }
        };

        // The URL carries the token; log the stream only.
        tracing::info!(stream_id = %stream_id, epoch = %epoch, "Opening chat connection");

        let ws = match timeout(self.connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => {
                tracing::error!(stream_id = %stream_id, epoch = %epoch, error = %e, "Chat handshake failed");
                self.shared.finish(epoch, ConnectionState::Error);
                return Err(TransportError::Handshake(e.to_string()));
            }
            Err(_) => {
                let timeout_secs = self.connect_timeout.as_secs();
                tracing::error!(stream_id = %stream_id, epoch = %epoch, timeout_secs, "Chat handshake timed out");
                self.shared.finish(epoch, ConnectionState::Error);
                return Err(TransportError::Timeout { timeout_secs });
            }
        };

        let (write, read) = ws.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(write, outbound_rx, epoch));

        // Hold the lock across spawn + Connected so the reader cannot publish
        // or report a close before the state says Connected.
        let mut inner = self.shared.lock();
        let reader = tokio::spawn(read_loop(
            Arc::clone(&self.shared),
            read,
            epoch,
            stream_id.clone(),
        ));
        inner.active = Some(ActiveSocket {
            epoch,
            outbound,
            reader,
        });
        set_state(&self.shared.state, ConnectionState::Connected);
        drop(inner);

        tracing::info!(stream_id = %stream_id, epoch = %epoch, "Chat connection open");
        Ok(epoch)
    }

    fn send(&self, payload: String) {
        let inner = self.shared.lock();
        match &inner.active {
            Some(socket) => {
                tracing::debug!(epoch = %socket.epoch, bytes = payload.len(), "Sending chat frame");
                if socket.outbound.send(Message::Text(payload)).is_err() {
                    tracing::debug!(epoch = %socket.epoch, "Chat writer gone, frame dropped");
                }
            }
            None => {
                tracing::debug!("No open chat connection, frame dropped");
            }
        }
    }

    async fn disconnect(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let epoch = self.retire(CLIENT_CLOSED_REASON);
        tracing::info!(epoch = %epoch, "Chat disconnected");
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.shared.events.subscribe()
    }

    fn state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }
}

impl Drop for WebSocketChatTransport {
    fn drop(&mut self) {
        let previous = self.shared.lock().active.take();
        if let Some(socket) = previous {
            close_socket(socket, CLIENT_CLOSED_REASON);
        }
    }
}

/// Reads frames until the socket closes, fails, or the task is aborted.
async fn read_loop(
    shared: Arc<Shared>,
    mut read: SplitStream<WsStream>,
    epoch: ConnectionEpoch,
    stream_id: StreamId,
) {
    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => match wire::decode(&text) {
                Ok(event) => {
                    tracing::debug!(
                        stream_id = %stream_id,
                        epoch = %epoch,
                        event_type = %event.event_type,
                        "Chat frame received"
                    );
                    if !shared.publish(epoch, event) {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        stream_id = %stream_id,
                        epoch = %epoch,
                        error = %e,
                        "Dropping malformed chat frame"
                    );
                }
            },
            Ok(Message::Binary(_)) => {
                tracing::warn!(stream_id = %stream_id, "Ignoring unsupported binary chat frame");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {
                // Control frames are answered by tungstenite
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (u16::from(f.code), f.reason.into_owned()))
                    .unwrap_or((1005, String::new()));
                tracing::info!(stream_id = %stream_id, epoch = %epoch, code, reason = %reason, "Chat closed by server");
                shared.finish(epoch, ConnectionState::Disconnected);
                return;
            }
            Err(e) => {
                tracing::error!(stream_id = %stream_id, epoch = %epoch, error = %e, "Chat connection failed");
                shared.finish(epoch, ConnectionState::Error);
                return;
            }
        }
    }

    tracing::info!(stream_id = %stream_id, epoch = %epoch, "Chat stream ended");
    shared.finish(epoch, ConnectionState::Disconnected);
}

/// Forwards queued frames to the socket; stops after sending a close frame.
async fn write_loop(
    mut write: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    epoch: ConnectionEpoch,
) {
    while let Some(message) = outbound.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = write.send(message).await {
            tracing::debug!(epoch = %epoch, error = %e, "Chat write failed");
            break;
        }
        if closing {
            break;
        }
    }
}
