//! Tracing subscriber setup.
//!
//! Logs go to stderr so that JSON analysis output on stdout stays clean.
//! The filter honours `RUST_LOG` and defaults to `info`.

use crate::config::LogFormat;
use crate::error::AppError;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(app_name: &str, format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                app_name.to_string(),
                std::io::stderr,
            ))
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| AppError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
