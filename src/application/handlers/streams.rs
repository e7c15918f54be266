//! Stream directory handlers - list, create, start and join streams.

use std::sync::Arc;

use crate::domain::foundation::{RemoteResult, StreamId};
use crate::domain::stream::{NewStream, Stream};
use crate::ports::StreamDirectory;

/// Lists the streams known to the platform.
pub struct ListStreamsHandler {
    directory: Arc<dyn StreamDirectory>,
}

impl ListStreamsHandler {
    pub fn new(directory: Arc<dyn StreamDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self) -> RemoteResult<Vec<Stream>> {
        self.directory.list_streams().await
    }
}

/// Command to create a stream.
#[derive(Debug, Clone, Default)]
pub struct CreateStreamCommand {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub category: String,
}

pub struct CreateStreamHandler {
    directory: Arc<dyn StreamDirectory>,
}

impl CreateStreamHandler {
    pub fn new(directory: Arc<dyn StreamDirectory>) -> Self {
        Self { directory }
    }

    /// Rejects a blank title without touching the network.
    pub async fn handle(&self, cmd: CreateStreamCommand) -> RemoteResult<Stream> {
        let input = match NewStream::new(cmd.title, cmd.description, cmd.thumbnail, cmd.category) {
            Ok(input) => input,
            Err(e) => return RemoteResult::Error(e.to_string()),
        };
        self.directory.create_stream(&input).await
    }
}

pub struct StartStreamHandler {
    directory: Arc<dyn StreamDirectory>,
}

impl StartStreamHandler {
    pub fn new(directory: Arc<dyn StreamDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self, stream_id: &StreamId) -> RemoteResult<String> {
        self.directory.start_stream(stream_id).await
    }
}

pub struct JoinStreamHandler {
    directory: Arc<dyn StreamDirectory>,
}

impl JoinStreamHandler {
    pub fn new(directory: Arc<dyn StreamDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self, stream_id: &StreamId) -> RemoteResult<String> {
        self.directory.join_stream(stream_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct MockDirectory {
        created: Mutex<Vec<NewStream>>,
        joined: Mutex<Vec<StreamId>>,
        fail_with: Option<String>,
    }

    impl MockDirectory {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        fn stream(id: &str, title: &str) -> Stream {
            Stream {
                id: StreamId::new(id).unwrap(),
                title: title.to_string(),
                description: None,
                thumbnail_url: None,
                category: None,
                owner_id: "owner".to_string(),
                viewers_count: 0,
                is_live: false,
                started_at: None,
                created_at: String::new(),
            }
        }
    }

    #[async_trait]
    impl StreamDirectory for MockDirectory {
        async fn list_streams(&self) -> RemoteResult<Vec<Stream>> {
            match &self.fail_with {
                Some(message) => RemoteResult::error(message.clone()),
                None => RemoteResult::Success(vec![Self::stream("s1", "One")]),
            }
        }

        async fn create_stream(&self, input: &NewStream) -> RemoteResult<Stream> {
            self.created.lock().unwrap().push(input.clone());
            RemoteResult::Success(Self::stream("new", input.title()))
        }

        async fn start_stream(&self, _id: &StreamId) -> RemoteResult<String> {
            RemoteResult::Success("Stream started".to_string())
        }

        async fn join_stream(&self, id: &StreamId) -> RemoteResult<String> {
            self.joined.lock().unwrap().push(id.clone());
            match &self.fail_with {
                Some(message) => RemoteResult::error(message.clone()),
                None => RemoteResult::Success("Joined".to_string()),
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_rejects_blank_title_locally() {
        let directory = Arc::new(MockDirectory::default());
        let handler = CreateStreamHandler::new(directory.clone());

        let result = handler
            .handle(CreateStreamCommand {
                title: "   ".to_string(),
                ..Default::default()
            })
            .await;

        assert!(result.error_message().unwrap().contains("title"));
        assert!(directory.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_forwards_trimmed_title() {
        let directory = Arc::new(MockDirectory::default());
        let handler = CreateStreamHandler::new(directory.clone());

        let stream = handler
            .handle(CreateStreamCommand {
                title: " Jam ".to_string(),
                category: "music".to_string(),
                ..Default::default()
            })
            .await
            .success()
            .unwrap();

        assert_eq!(stream.title, "Jam");
        assert_eq!(directory.created.lock().unwrap()[0].category, "music");
    }

    #[tokio::test]
    async fn list_passes_errors_through() {
        let handler = ListStreamsHandler::new(Arc::new(MockDirectory::failing("Error 500: boom")));
        let result = handler.handle().await;
        assert_eq!(result.error_message(), Some("Error 500: boom"));
    }

    #[tokio::test]
    async fn join_targets_given_stream() {
        let directory = Arc::new(MockDirectory::default());
        let handler = JoinStreamHandler::new(directory.clone());
        let id = StreamId::new("s9").unwrap();

        assert_eq!(handler.handle(&id).await.success().as_deref(), Some("Joined"));
        assert_eq!(directory.joined.lock().unwrap()[0], id);
    }

    #[tokio::test]
    async fn start_returns_server_message() {
        let handler = StartStreamHandler::new(Arc::new(MockDirectory::default()));
        let id = StreamId::new("s1").unwrap();
        assert!(handler.handle(&id).await.is_success());
    }
}
