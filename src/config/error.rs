//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid WebSocket base URL (expected ws:// or wss://)")]
    InvalidWebSocketUrl,

    #[error("Invalid API base URL (expected http:// or https://)")]
    InvalidApiUrl,

    #[error("Event buffer capacity must be at least {min}")]
    BufferTooSmall { min: usize },

    #[error("Invalid timeout (must be 1-300 seconds)")]
    InvalidTimeout,

    #[error("Login email configured without a password")]
    IncompleteLogin,
}
