//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit one event per written response, levelled by status class
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via `RUST_LOG`, falling back to config

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_filter: &str) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Log a written response: 2xx/3xx at info, 4xx at warn, 5xx at error.
pub fn log_response(status: u16, path: &str) {
    match status {
        500..=599 => tracing::error!(status, path = %path, "Response written"),
        400..=499 => tracing::warn!(status, path = %path, "Response written"),
        _ => tracing::info!(status, path = %path, "Response written"),
    }
}
