//! Shared REST client.
//!
//! Builds endpoint URLs from path segments under the configured base URL,
//! attaches the bearer token where the platform expects one, and folds every
//! failure into [`RemoteResult::Error`].

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use crate::domain::foundation::RemoteResult;
use crate::ports::CredentialProvider;

/// Errors raised while building the client or a request.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("API base URL cannot carry a path: {0}")]
    NotABaseUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Whether a request path must carry `Authorization: Bearer`.
pub fn requires_bearer(path: &str) -> bool {
    path.contains("/protected/") || path.contains("/api/streams")
}

/// REST client shared by the HTTP adapters.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::NotABaseUrl(config.base_url.clone()));
        }

        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            base_url,
            client,
            credentials,
        })
    }

    /// URL of the endpoint at `segments` below the base URL.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `#` inside an id
    /// stay part of that segment. An empty last segment yields a trailing slash.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::NotABaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Starts a request to the endpoint at `segments`.
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiClientError> {
        let url = self.endpoint(segments)?;

        let mut builder = self.client.request(method, url.clone());
        if requires_bearer(url.path()) {
            if let Some(token) = self.credentials.auth_token() {
                builder = builder.bearer_auth(token);
            }
        }
        Ok(builder)
    }

    /// Sends a bodiless request and decodes the JSON response.
    pub async fn fetch<T: DeserializeOwned>(&self, method: Method, segments: &[&str]) -> RemoteResult<T> {
        match self.request(method, segments) {
            Ok(builder) => self.send_json(builder).await,
            Err(e) => RemoteResult::Error(e.to_string()),
        }
    }

    /// Sends `body` as JSON and decodes the JSON response.
    pub async fn submit<B, T>(&self, method: Method, segments: &[&str], body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.request(method, segments) {
            Ok(builder) => self.send_json(builder.json(body)).await,
            Err(e) => RemoteResult::Error(e.to_string()),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        let response = match self.send(builder).await {
            Ok(response) => response,
            Err(message) => return RemoteResult::Error(message),
        };

        match response.json::<T>().await {
            Ok(body) => RemoteResult::Success(body),
            Err(e) => RemoteResult::Error(format!("Invalid response: {}", e)),
        }
    }

    /// Sends a request, mapping transport failures and non-2xx statuses to messages.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, String> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "API request failed");
            if e.is_timeout() {
                "Request timed out".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let body = if body.trim().is_empty() {
            format!("Error HTTP {}", code)
        } else {
            body
        };
        tracing::warn!(status = code, "API request rejected");
        Err(format!("Error {}: {}", code, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credentials::InMemoryCredentialStore;

    const STREAMS: &[&str] = &["api", "streams", ""];

    fn client_at(base_url: &str, token: Option<&str>) -> Result<ApiClient, ApiClientError> {
        let store = match token {
            Some(token) => InMemoryCredentialStore::with_credentials(token, None),
            None => InMemoryCredentialStore::new(),
        };
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, Arc::new(store))
    }

    fn client_with_token(token: Option<&str>) -> ApiClient {
        client_at("http://localhost:8080", token).unwrap()
    }

    fn authorization(builder: RequestBuilder) -> Option<String> {
        let request = builder.build().unwrap();
        request
            .headers()
            .get("authorization")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn bearer_rule_matches_protected_and_stream_paths() {
        assert!(requires_bearer("/api/protected/me"));
        assert!(requires_bearer("/api/streams/"));
        assert!(requires_bearer("/api/streams/42/join"));
        assert!(!requires_bearer("/api/users/login"));
        assert!(!requires_bearer("/api/users/register"));
    }

    #[test]
    fn stream_requests_carry_bearer_token() {
        let client = client_with_token(Some("tok-1"));
        let builder = client.request(Method::GET, STREAMS).unwrap();
        assert_eq!(authorization(builder).as_deref(), Some("Bearer tok-1"));
    }

    #[test]
    fn login_requests_carry_no_token() {
        let client = client_with_token(Some("tok-1"));
        let builder = client.request(Method::POST, &["api", "users", "login"]).unwrap();
        assert_eq!(authorization(builder), None);
    }

    #[test]
    fn missing_token_sends_no_header() {
        let client = client_with_token(None);
        let builder = client.request(Method::GET, STREAMS).unwrap();
        assert_eq!(authorization(builder), None);
    }

    #[test]
    fn base_url_without_trailing_slash_still_joins() {
        let client = client_with_token(None);
        let request = client.request(Method::GET, STREAMS).unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/streams/");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = client_at("http://localhost:8080/v1", None).unwrap();
        let url = client.endpoint(&["api", "users", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/api/users/login");
    }

    #[test]
    fn reserved_characters_in_ids_stay_in_their_segment() {
        let client = client_with_token(Some("tok-1"));
        let url = client
            .endpoint(&["api", "streams", "a/b?c#d", "join"])
            .unwrap();

        assert_eq!(url.path(), "/api/streams/a%2Fb%3Fc%23d/join");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn id_cannot_escape_into_a_protected_path() {
        let client = client_with_token(Some("tok-1"));
        let builder = client
            .request(Method::POST, &["api", "users", "../protected/x"])
            .unwrap();
        assert_eq!(authorization(builder), None);
    }

    #[test]
    fn unusable_base_urls_are_typed_errors() {
        assert!(matches!(
            client_at("not a url", None),
            Err(ApiClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            client_at("mailto:chat@example.com", None),
            Err(ApiClientError::NotABaseUrl(_))
        ));
    }
}
