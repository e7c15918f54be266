//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STREAMHUB` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use streamhub_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Chat server at {}", config.chat.ws_base_url);
//! ```

mod api;
mod auth;
mod chat;
mod client;
mod error;

pub use api::ApiConfig;
pub use auth::AuthConfig;
pub use chat::{ChatConfig, MIN_EVENT_BUFFER_CAPACITY};
pub use client::{ClientConfig, LogFormat};
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a client
/// pointed at the Android emulator's host loopback (`10.0.2.2:8080`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Chat WebSocket settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STREAMHUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STREAMHUB__CHAT__WS_BASE_URL=wss://...` -> `chat.ws_base_url = ...`
    /// - `STREAMHUB__API__REQUEST_TIMEOUT_SECS=10` -> `api.request_timeout_secs = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STREAMHUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.client.validate()?;
        self.chat.validate()?;
        self.api.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}
