//! Transport-level dispatch: one inbound request in, exactly one response out.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → registry lookup (404 wire error when absent)
//!     → under request deadline     ── elapsed → timeout_failure
//!         → read body (bounded)     ── fail → decode_failure
//!         → Handler::call
//!             → decode request      ── fail → decode_failure
//!             → business logic      ── Err  → business WireError
//!             → encode response     ── fail → encode_failure
//!     → write response
//!     → observability event (status, path)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::ServiceConfig;
use crate::dispatch::context::RequestContext;
use crate::dispatch::handler::Outcome;
use crate::observability;
use crate::routing::RouteRegistry;
use crate::wire::{codec, WireError};

/// Message of the 404 written for unregistered paths.
pub const NO_ROUTE_MESSAGE: &str = "No route is registered for this path.";

/// Frozen registry and configuration shared by every request.
pub struct DispatchState {
    pub registry: RouteRegistry,
    pub config: Arc<ServiceConfig>,
}

fn json_response(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// Write a wire error, enforcing a valid status and the scrubbing policy.
pub fn error_response(mut wire: WireError, config: &ServiceConfig) -> Response {
    if !wire.has_valid_code() {
        tracing::warn!(code = wire.code, message = %wire.message, "Error carries an invalid status code, sending 500");
        wire.code = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
    }
    if !config.expose_internal {
        wire.internal.clear();
    }

    let status = wire.status();
    match codec::encode(&wire) {
        Ok(body) => json_response(status, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode wire error");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Turn a handler outcome into the single response for this request.
pub fn respond(outcome: Outcome, path: &str, config: &ServiceConfig) -> Response {
    match outcome {
        Outcome::Success(body) => json_response(StatusCode::OK, body),
        Outcome::Failed(wire) => error_response(wire, config),
        Outcome::ReadFailed(e) => {
            tracing::debug!(path = %path, error = %e, "Failed to read request body");
            error_response(config.decode_failure.to_wire(e), config)
        }
        Outcome::DecodeFailed(e) => {
            tracing::debug!(path = %path, error = %e, "Failed to decode request body");
            error_response(config.decode_failure.to_wire(e.to_string()), config)
        }
        Outcome::EncodeFailed(e) => {
            tracing::error!(path = %path, error = %e, "Failed to encode response value");
            error_response(config.encode_failure.to_wire(e.to_string()), config)
        }
        Outcome::TimedOut(deadline) => {
            tracing::warn!(path = %path, deadline_ms = deadline.as_millis() as u64, "Request timed out");
            error_response(
                config.timeout_failure.to_wire(format!("no response within {:?}", deadline)),
                config,
            )
        }
    }
}

/// Fallback handler of the transport router.
pub async fn dispatch(State(state): State<Arc<DispatchState>>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_path = request.uri().path().to_string();

    let Some(route) = state.registry.match_path(&request_path) else {
        let response = error_response(
            WireError::new(StatusCode::NOT_FOUND.as_u16(), NO_ROUTE_MESSAGE).with_internal(request_path.clone()),
            &state.config,
        );
        observability::response_written(&request_path, response.status().as_u16(), start);
        return response;
    };

    tracing::debug!(
        method = %request.method(),
        path = %route.path,
        "Dispatching request"
    );

    let (parts, body) = request.into_parts();
    let ctx = RequestContext::from_parts(parts, route.path.clone());

    let deadline = Duration::from_secs(state.config.request_timeout_secs);
    let work = async {
        match axum::body::to_bytes(body, state.config.max_body_size).await {
            Ok(bytes) => route.handler.call(bytes, ctx).await,
            Err(e) => Outcome::ReadFailed(e.to_string()),
        }
    };
    // Dropping the work future on elapse cancels the logic.
    let outcome = tokio::time::timeout(deadline, work)
        .await
        .unwrap_or(Outcome::TimedOut(deadline));

    let response = respond(outcome, &route.path, &state.config);
    observability::response_written(&route.path, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorTemplate;
    use crate::wire::CodecError;

    async fn body_of(response: Response) -> WireError {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn codec_error() -> CodecError {
        codec::decode::<u32>(b"x").unwrap_err()
    }

    #[tokio::test]
    async fn test_decode_failure_uses_config() {
        let mut config = ServiceConfig::default();
        config.decode_failure = ErrorTemplate::new(400, "bad body");

        let response = respond(Outcome::DecodeFailed(codec_error()), "/divide/", &config);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let wire = body_of(response).await;
        assert_eq!(wire.code, 400);
        assert_eq!(wire.message, "bad body");
        assert!(!wire.internal.is_empty());
    }

    #[tokio::test]
    async fn test_encode_failure_overrides_success() {
        let config = ServiceConfig::default();
        let response = respond(Outcome::EncodeFailed(codec_error()), "/divide/", &config);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.message, "Failed to encode your response.");
    }

    #[tokio::test]
    async fn test_internal_scrubbed() {
        let mut config = ServiceConfig::default();
        config.expose_internal = false;

        let wire = WireError::new(409, "conflict").with_internal("row 7 locked");
        let response = error_response(wire, &config);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_of(response).await, WireError::new(409, "conflict"));
    }

    #[tokio::test]
    async fn test_invalid_code_rewritten() {
        let config = ServiceConfig::default();
        let response = error_response(WireError::new(42, "odd"), &config);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.code, 500);
    }

    #[tokio::test]
    async fn test_timeout_uses_config() {
        let config = ServiceConfig::default();
        let response = respond(Outcome::TimedOut(Duration::from_secs(1)), "/slow/", &config);
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let wire = body_of(response).await;
        assert_eq!(wire.message, "Your request timed out.");
        assert_eq!(wire.code, 408);
    }

    #[tokio::test]
    async fn test_success_is_json() {
        let config = ServiceConfig::default();
        let response = respond(Outcome::Success(Bytes::from_static(b"{}")), "/x/", &config);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
