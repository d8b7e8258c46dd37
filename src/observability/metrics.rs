//! Metrics collection and exposition.
//!
//! # Metrics
//! - `optic_responses_total` (counter): responses by route path, status
//! - `optic_dispatch_duration_seconds` (histogram): dispatch latency by route path
//! - `optic_client_calls_total` (counter): client calls by route path, outcome
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until a recorder is installed
//! - Prometheus exporter is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a response written by the dispatcher.
pub fn record_response(path: &str, status: u16, start: Instant) {
    metrics::counter!(
        "optic_responses_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("optic_dispatch_duration_seconds", "path" => path.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a client call ("ok", "remote" or "transport").
pub fn record_client_call(path: &str, outcome: &'static str) {
    metrics::counter!(
        "optic_client_calls_total",
        "path" => path.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
