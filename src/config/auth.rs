//! Authentication configuration
//!
//! Either a ready token (plus optional user id) or login credentials may be
//! supplied. Both are optional: without them the client connects anonymously.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Pre-issued auth token
    pub token: Option<Secret<String>>,

    /// Viewer id matching `token`
    pub user_id: Option<String>,

    /// Login email
    pub email: Option<String>,

    /// Login password
    pub password: Option<Secret<String>>,
}

impl AuthConfig {
    /// Check if a pre-issued token is configured
    pub fn has_token(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Login credentials, when both email and password are configured
    pub fn login_credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|e| !e.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .filter(|p| !p.is_empty())?;
        Some((email, password))
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_email = self.email.as_ref().is_some_and(|e| !e.is_empty());
        if has_email && self.login_credentials().is_none() {
            return Err(ValidationError::IncompleteLogin);
        }
        Ok(())
    }
}
