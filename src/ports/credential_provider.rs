//! Credential provider port.
//!
//! The chat core and the REST adapters only ever ask two questions: what is
//! the current auth token, and who is the current viewer. How the answers are
//! persisted is the adapter's business.

use crate::domain::foundation::UserId;

/// Read access to the current viewer's credentials.
pub trait CredentialProvider: Send + Sync {
    /// Current auth token, if the viewer is logged in.
    fn auth_token(&self) -> Option<String>;

    /// Current viewer's user id, if known.
    fn user_id(&self) -> Option<UserId>;
}

/// Write access used by the login flow.
pub trait CredentialStore: CredentialProvider {
    fn save_token(&self, token: String);

    fn save_user_id(&self, user_id: UserId);

    /// Forgets both token and user id.
    fn clear(&self);
}
