//! HTTP implementation of [`StreamDirectory`].

use async_trait::async_trait;
use reqwest::Method;

use super::client::ApiClient;
use super::dto::{CreateStreamRequest, MessageResponse, StreamResponse};
use crate::domain::foundation::{RemoteResult, StreamId};
use crate::domain::stream::{NewStream, Stream};
use crate::ports::StreamDirectory;

const STREAMS: &[&str] = &["api", "streams", ""];

/// Stream directory backed by the platform's `api/streams` endpoints.
#[derive(Clone)]
pub struct HttpStreamDirectory {
    api: ApiClient,
}

impl HttpStreamDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StreamDirectory for HttpStreamDirectory {
    async fn list_streams(&self) -> RemoteResult<Vec<Stream>> {
        self.api
            .fetch::<Vec<StreamResponse>>(Method::GET, STREAMS)
            .await
            .map(|streams| streams.into_iter().map(Stream::from).collect())
    }

    async fn create_stream(&self, input: &NewStream) -> RemoteResult<Stream> {
        let body = CreateStreamRequest::from(input);
        let result = self
            .api
            .submit::<_, StreamResponse>(Method::POST, STREAMS, &body)
            .await
            .map(Stream::from);

        if let RemoteResult::Success(stream) = &result {
            tracing::info!(stream_id = %stream.id, title = %stream.title, "Stream created");
        }
        result
    }

    async fn start_stream(&self, id: &StreamId) -> RemoteResult<String> {
        self.api
            .fetch::<MessageResponse>(Method::PUT, &["api", "streams", id.as_str(), "start"])
            .await
            .map(|body| body.message)
    }

    async fn join_stream(&self, id: &StreamId) -> RemoteResult<String> {
        self.api
            .fetch::<MessageResponse>(Method::POST, &["api", "streams", id.as_str(), "join"])
            .await
            .map(|body| body.message)
    }
}
