//! Configuration schema definitions.
//!
//! All types derive Serde traits so a service or client can be configured
//! from a TOML file as well as in code.

use serde::{Deserialize, Serialize};

use crate::wire::WireError;

/// Root configuration for a dispatch service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Prefix joined in front of every managed route.
    pub base_path: String,

    /// Written when a successful response value cannot be encoded.
    pub encode_failure: ErrorTemplate,

    /// Written when the request body cannot be read or decoded.
    pub decode_failure: ErrorTemplate,

    /// Written when a managed route does not answer within `request_timeout_secs`.
    pub timeout_failure: ErrorTemplate,

    /// Send `internal` diagnostic detail to callers.
    pub expose_internal: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Deadline for reading the body and running a managed route, in seconds.
    pub request_timeout_secs: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4444,
            base_path: "/".to_string(),
            encode_failure: ErrorTemplate {
                code: 500,
                message: "Failed to encode your response.".to_string(),
            },
            decode_failure: ErrorTemplate {
                code: 406,
                message: "Failed to decode your request body.".to_string(),
            },
            timeout_failure: ErrorTemplate {
                code: 408,
                message: "Your request timed out.".to_string(),
            },
            expose_internal: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Status and message of an infrastructure failure written by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorTemplate {
    pub code: u16,
    pub message: String,
}

impl ErrorTemplate {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Instantiate the template with diagnostic detail.
    pub fn to_wire(&self, internal: impl Into<String>) -> WireError {
        WireError::new(self.code, self.message.clone()).with_internal(internal)
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Generate and propagate `x-request-id` headers.
    pub request_ids: bool,

    /// Start the Prometheus exporter in `Service::run`.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "optic=info,tower_http=info".to_string(),
            request_ids: true,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Configuration for the typed client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL routes are joined against (e.g., "http://127.0.0.1:4444/api/").
    pub base_url: String,

    /// Token sent as `Authorization` on every call that does not supply its own.
    pub auth_token: Option<String>,

    /// Deadline for a single call in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build the base URL from its parts.
    pub fn from_parts(host: &str, port: Option<u16>, path: &str, secure: bool) -> Self {
        let scheme = if secure { "https" } else { "http" };
        let authority = match port {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self::new(format!("{}://{}{}", scheme, authority, path))
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4444/".to_string(),
            auth_token: None,
            timeout_secs: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            port = 4040
            base_path = "/api/optic/"

            [decode_failure]
            code = 400
            message = "bad body"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 4040);
        assert_eq!(config.base_path, "/api/optic/");
        assert_eq!(config.decode_failure, ErrorTemplate::new(400, "bad body"));
        assert_eq!(config.encode_failure.code, 500);
        assert_eq!(config.timeout_failure.code, 408);
        assert!(config.expose_internal);
        assert_eq!(config.bind_address(), "0.0.0.0:4040");
    }

    #[test]
    fn test_client_from_parts() {
        let config = ClientConfig::from_parts("127.0.0.1", Some(4040), "api/optic/", false);
        assert_eq!(config.base_url, "http://127.0.0.1:4040/api/optic/");

        let config = ClientConfig::from_parts("example.com", None, "/", true);
        assert_eq!(config.base_url, "https://example.com/");
    }

    #[test]
    fn test_template_to_wire() {
        let wire = ErrorTemplate::new(406, "bad").to_wire("expected value at line 1");
        assert_eq!(wire.code, 406);
        assert_eq!(wire.message, "bad");
        assert_eq!(wire.internal, "expected value at line 1");
    }
}
