//! Auth gateway port - login and registration against the platform.

use async_trait::async_trait;

use crate::domain::foundation::RemoteResult;

/// Authenticates the viewer.
///
/// # Contract
///
/// - `login` stores the token (and, when obtainable, the user id) in the
///   credential store before returning `Success(token)`
/// - `register` never logs the viewer in
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> RemoteResult<String>;

    /// Returns the new account's id (or another server acknowledgement).
    async fn register(&self, username: &str, email: &str, password: &str) -> RemoteResult<String>;
}
