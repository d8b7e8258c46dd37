//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every written response produces exactly one (status, path) event
//! - Request ID flows through the request extensions and headers

pub mod logging;
pub mod metrics;

use std::time::Instant;

/// Emit the observability event for a written response.
pub fn response_written(path: &str, status: u16, start: Instant) {
    logging::log_response(status, path);
    metrics::record_response(path, status, start);
}
