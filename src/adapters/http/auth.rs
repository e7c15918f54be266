//! HTTP implementation of [`AuthGateway`].
//!
//! A successful login stores the token, then asks `api/protected/me` for the
//! viewer's id so chat messages can be attributed. The second call is best
//! effort: the login still succeeds when it fails.

use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

use super::client::ApiClient;
use super::dto::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse};
use crate::domain::foundation::{RemoteResult, UserId};
use crate::ports::{AuthGateway, CredentialStore};

pub struct HttpAuthGateway {
    api: ApiClient,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpAuthGateway {
    /// `api` must read its bearer token from the same `credentials` store.
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { api, credentials }
    }

    async fn remember_viewer(&self) {
        match self
            .api
            .fetch::<MeResponse>(Method::GET, &["api", "protected", "me"])
            .await
        {
            RemoteResult::Success(me) => match UserId::new(me.user_id) {
                Ok(user_id) => {
                    tracing::debug!(user_id = %user_id, "Viewer id stored");
                    self.credentials.save_user_id(user_id);
                }
                Err(e) => tracing::warn!(error = %e, "Server returned an empty viewer id"),
            },
            RemoteResult::Error(message) => {
                tracing::warn!(error = %message, "Failed to fetch viewer profile");
            }
            RemoteResult::Loading => {}
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> RemoteResult<String> {
        let body = LoginRequest { email, password };
        let response = self
            .api
            .submit::<_, LoginResponse>(Method::POST, &["api", "users", "login"], &body)
            .await;

        match response {
            RemoteResult::Success(LoginResponse { token }) => {
                self.credentials.save_token(token.clone());
                self.remember_viewer().await;
                tracing::info!("Logged in");
                RemoteResult::Success(token)
            }
            RemoteResult::Error(message) => RemoteResult::Error(message),
            RemoteResult::Loading => RemoteResult::Loading,
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> RemoteResult<String> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        self.api
            .submit::<_, RegisterResponse>(Method::POST, &["api", "users", "register"], &body)
            .await
            .map(RegisterResponse::acknowledgement)
    }
}
