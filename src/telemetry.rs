//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured `client.log_level`
//! directive is used.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ClientConfig, LogFormat};

/// Installs the global tracing subscriber.
///
/// Returns an error if a global subscriber was already installed.
pub fn init_tracing(
    config: &ClientConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init(),
    }
}
