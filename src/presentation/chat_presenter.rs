//! Chat presenter - folds the session core's streams into one view state.
//!
//! ```text
//!   ChatSubscription.state ────► state consumer ───┐
//!                                                  ├──► watch<ChatState>
//!   ChatSubscription.messages ─► message consumer ─┘
//! ```
//!
//! Each consumer applies its update with a single `send_modify`, so readers
//! never see a half-applied change.

use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::{ChatSessionCore, ChatSubscription};
use crate::domain::chat::{ChatMessage, ConnectionState};
use crate::domain::foundation::StreamId;
use crate::ports::ConnectionEpoch;

/// Error text shown when the connection fails.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

/// What a chat screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub is_connected: bool,
    pub error: Option<String>,
}

impl ChatState {
    fn apply_connection(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => {
                self.is_connected = true;
                self.error = None;
            }
            ConnectionState::Error => {
                self.is_connected = false;
                self.error = Some(CONNECTION_ERROR_MESSAGE.to_string());
            }
            ConnectionState::Disconnected => {
                self.is_connected = false;
                self.error = None;
            }
        }
    }
}

/// Presentation adapter for one stream's chat.
pub struct ChatPresenter {
    core: Arc<ChatSessionCore>,
    stream_id: StreamId,
    /// The session this presenter opened; `None` when the connect failed.
    epoch: Option<ConnectionEpoch>,
    state: Arc<watch::Sender<ChatState>>,
    consumers: Mutex<Vec<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl ChatPresenter {
    /// Connects `core` to the stream's chat and starts folding its updates.
    ///
    /// A failed connect is reported through the state's `error`.
    pub async fn start(core: Arc<ChatSessionCore>, stream_id: StreamId) -> Self {
        let (state, _) = watch::channel(ChatState::default());
        let state = Arc::new(state);

        let (epoch, consumers) = match core.connect(&stream_id).await {
            Ok(subscription) => (Some(subscription.epoch), spawn_consumers(subscription, &state)),
            Err(e) => {
                tracing::warn!(stream_id = %stream_id, error = %e, "Chat unavailable");
                state.send_modify(|s| s.apply_connection(ConnectionState::Error));
                (None, Vec::new())
            }
        };

        Self {
            core,
            stream_id,
            epoch,
            state,
            consumers: Mutex::new(consumers),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    /// Observes the view state.
    pub fn state(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    /// Current view state.
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Sends user input. Surrounding whitespace is trimmed; blank input is ignored.
    pub fn send_message(&self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        if let Err(e) = self.core.send_message(content) {
            tracing::warn!(error = %e, "Failed to send chat message");
        }
    }

    /// Stops the consumers and disconnects the chat. Later calls do nothing.
    ///
    /// Only this presenter's own session is closed; if another caller has
    /// since connected the core elsewhere, that session stays up.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.abort_consumers();
        if let Some(epoch) = self.epoch {
            self.core.disconnect_epoch(epoch).await;
        }
        self.state
            .send_modify(|s| s.apply_connection(ConnectionState::Disconnected));
    }

    fn abort_consumers(&self) {
        let mut consumers = self.consumers.lock().unwrap_or_else(|e| e.into_inner());
        for consumer in consumers.drain(..) {
            consumer.abort();
        }
    }
}

impl Drop for ChatPresenter {
    fn drop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.abort_consumers();
        let Some(epoch) = self.epoch else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let core = self.core.clone();
                handle.spawn(async move {
                    core.disconnect_epoch(epoch).await;
                });
            }
            Err(_) => {
                tracing::warn!(stream_id = %self.stream_id, "Chat presenter dropped outside a runtime; connection left open");
            }
        }
    }
}

fn spawn_consumers(
    subscription: ChatSubscription,
    state: &Arc<watch::Sender<ChatState>>,
) -> Vec<JoinHandle<()>> {
    let ChatSubscription {
        mut messages,
        state: mut connection,
        ..
    } = subscription;

    let sink = state.clone();
    let state_consumer = tokio::spawn(async move {
        loop {
            let current = *connection.borrow_and_update();
            sink.send_modify(|s| s.apply_connection(current));
            if connection.changed().await.is_err() {
                break;
            }
        }
    });

    let sink = state.clone();
    let message_consumer = tokio::spawn(async move {
        while let Some(message) = messages.next().await {
            sink.send_modify(|s| s.messages.push(message));
        }
    });

    vec![state_consumer, message_consumer]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credentials::InMemoryCredentialStore;
    use crate::adapters::websocket::InMemoryChatTransport;
    use crate::domain::foundation::UserId;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn start(transport: &Arc<InMemoryChatTransport>) -> ChatPresenter {
        let credentials = InMemoryCredentialStore::with_credentials("tok", Some(UserId::new("me").unwrap()));
        let core = Arc::new(ChatSessionCore::new(transport.clone(), Arc::new(credentials)));
        ChatPresenter::start(core, StreamId::new("s1").unwrap()).await
    }

    async fn wait_for(presenter: &ChatPresenter, predicate: impl FnMut(&ChatState) -> bool) -> ChatState {
        let mut rx = presenter.state();
        let state = timeout(Duration::from_secs(1), rx.wait_for(predicate))
            .await
            .expect("state never matched")
            .unwrap()
            .clone();
        state
    }

    #[test]
    fn connection_mapping() {
        let mut state = ChatState::default();

        state.apply_connection(ConnectionState::Error);
        assert!(!state.is_connected);
        assert_eq!(state.error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));

        state.apply_connection(ConnectionState::Disconnected);
        assert!(!state.is_connected);
        assert_eq!(state.error, None);

        state.apply_connection(ConnectionState::Error);

        state.apply_connection(ConnectionState::Connected);
        assert!(state.is_connected);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn start_reports_connected() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;
        wait_for(&presenter, |s| s.is_connected).await;
    }

    #[tokio::test]
    async fn messages_append_in_arrival_order() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;

        transport.receive_raw(r#"{"type":"message","id":"1","user_id":"me"}"#);
        transport.receive_raw(r#"{"type":"message","id":"2","user_id":"you"}"#);
        transport.receive_raw(r#"{"type":"message","id":"1","user_id":"me"}"#);

        let state = wait_for(&presenter, |s| s.messages.len() == 3).await;
        let ids: Vec<_> = state.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "1"]);
        assert!(state.messages[0].is_own_message);
        assert!(!state.messages[1].is_own_message);
    }

    #[tokio::test]
    async fn transport_failure_shows_connection_error() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;
        wait_for(&presenter, |s| s.is_connected).await;

        transport.fail();
        let state = wait_for(&presenter, |s| s.error.is_some()).await;
        assert!(!state.is_connected);
        assert_eq!(state.error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn refused_connect_shows_connection_error() {
        let transport = Arc::new(InMemoryChatTransport::new());
        transport.refuse_connections(true);
        let presenter = start(&transport).await;

        let state = presenter.snapshot();
        assert!(!state.is_connected);
        assert_eq!(state.error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn send_trims_and_ignores_blank_input() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;

        presenter.send_message("   ");
        presenter.send_message("  hello  ");

        assert_eq!(
            transport.sent_frames(),
            vec![r#"{"type":"send_message","content":"hello"}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn stop_disconnects_exactly_once() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;

        presenter.stop().await;
        presenter.stop().await;
        drop(presenter);
        tokio::task::yield_now().await;

        assert_eq!(transport.close_count(), 1);
        assert_eq!(transport.open_stream(), None);
    }

    #[tokio::test]
    async fn drop_without_stop_disconnects() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;

        drop(presenter);

        timeout(Duration::from_secs(1), async {
            while transport.open_stream().is_some() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("drop never disconnected");
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn stop_after_failure_clears_error() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let presenter = start(&transport).await;
        wait_for(&presenter, |s| s.is_connected).await;

        transport.fail();
        wait_for(&presenter, |s| s.error.is_some()).await;
        presenter.stop().await;

        let state = presenter.snapshot();
        assert!(!state.is_connected);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn dropped_presenter_leaves_next_session_open() {
        let transport = Arc::new(InMemoryChatTransport::new());
        let credentials = InMemoryCredentialStore::with_credentials("tok", Some(UserId::new("me").unwrap()));
        let core = Arc::new(ChatSessionCore::new(transport.clone(), Arc::new(credentials)));

        let first = ChatPresenter::start(core.clone(), StreamId::new("A").unwrap()).await;
        drop(first);
        let second = ChatPresenter::start(core.clone(), StreamId::new("B").unwrap()).await;

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(transport.open_stream(), Some(StreamId::new("B").unwrap()));
        assert_eq!(core.active_stream().await, Some(StreamId::new("B").unwrap()));
        assert!(wait_for(&second, |s| s.is_connected).await.is_connected);
    }
}
