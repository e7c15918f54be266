//! Stream directory port - list, create, start and join streams.

use async_trait::async_trait;

use crate::domain::foundation::{RemoteResult, StreamId};
use crate::domain::stream::{NewStream, Stream};

/// Request/response access to the platform's stream directory.
///
/// Every operation folds failures into [`RemoteResult::Error`].
#[async_trait]
pub trait StreamDirectory: Send + Sync {
    async fn list_streams(&self) -> RemoteResult<Vec<Stream>>;

    async fn create_stream(&self, input: &NewStream) -> RemoteResult<Stream>;

    /// Marks the stream live. Returns the server's confirmation message.
    async fn start_stream(&self, id: &StreamId) -> RemoteResult<String>;

    /// Registers the viewer on the stream. Returns the server's confirmation message.
    async fn join_stream(&self, id: &StreamId) -> RemoteResult<String>;
}
