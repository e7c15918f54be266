//! In-memory credential store.
//!
//! Holds the token as a [`Secret`] so it never lands in `Debug` output or logs.
//! Nothing is persisted; a restarted client starts logged out unless the
//! token is supplied through configuration.

use secrecy::{ExposeSecret, Secret};
use std::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::ports::{CredentialProvider, CredentialStore};

#[derive(Default)]
struct Credentials {
    token: Option<Secret<String>>,
    user_id: Option<UserId>,
}

/// Process-local [`CredentialStore`].
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Credentials>,
}

impl InMemoryCredentialStore {
    /// Creates an empty (logged out) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a token and optional viewer id.
    pub fn with_credentials(token: impl Into<String>, user_id: Option<UserId>) -> Self {
        Self {
            inner: RwLock::new(Credentials {
                token: Some(Secret::new(token.into())),
                user_id,
            }),
        }
    }
}

impl CredentialProvider for InMemoryCredentialStore {
    fn auth_token(&self) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.token.as_ref().map(|t| t.expose_secret().clone())
    }

    fn user_id(&self) -> Option<UserId> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.user_id.clone()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn save_token(&self, token: String) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.token = Some(Secret::new(token));
    }

    fn save_user_id(&self, user_id: UserId) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.user_id = Some(user_id);
    }

    fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.token = None;
        inner.user_id = None;
    }
}

impl std::fmt::Debug for InMemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("InMemoryCredentialStore")
            .field("has_token", &inner.token.is_some())
            .field("user_id", &inner.user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_logged_out() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.auth_token(), None);
        assert_eq!(store.user_id(), None);
    }

    #[test]
    fn saves_and_returns_credentials() {
        let store = InMemoryCredentialStore::new();
        store.save_token("tok-1".to_string());
        store.save_user_id(UserId::new("user-7").unwrap());

        assert_eq!(store.auth_token().as_deref(), Some("tok-1"));
        assert_eq!(store.user_id().unwrap().as_str(), "user-7");
    }

    #[test]
    fn clear_forgets_everything() {
        let store = InMemoryCredentialStore::with_credentials("tok", UserId::new("u").ok());
        store.clear();
        assert_eq!(store.auth_token(), None);
        assert_eq!(store.user_id(), None);
    }

    #[test]
    fn debug_output_hides_token() {
        let store = InMemoryCredentialStore::with_credentials("super-secret", None);
        let debug = format!("{:?}", store);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("has_token: true"));
    }
}
