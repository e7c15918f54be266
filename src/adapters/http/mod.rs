//! HTTP adapters - REST client for the platform API.
//!
//! - [`client`] - shared reqwest client, bearer rule, error mapping
//! - [`streams`] - [`StreamDirectory`](crate::ports::StreamDirectory)
//! - [`auth`] - [`AuthGateway`](crate::ports::AuthGateway)

pub mod auth;
pub mod client;
pub mod dto;
pub mod streams;

pub use auth::HttpAuthGateway;
pub use client::{requires_bearer, ApiClient, ApiClientError};
pub use streams::HttpStreamDirectory;
