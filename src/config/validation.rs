//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status codes, body limits, timeouts)
//! - Validate path and URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure functions: config → Result<(), Vec<ValidationError>>

use std::fmt;

use url::Url;

use crate::config::schema::{ClientConfig, ErrorTemplate, ServiceConfig};
use crate::wire::error::can_carry_body;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

fn check_template(field: &str, template: &ErrorTemplate, errors: &mut Vec<ValidationError>) {
    if !can_carry_body(template.code) {
        errors.push(ValidationError::new(
            field,
            format!("status code {} cannot carry an error body", template.code),
        ));
    }
}

/// Validate a service configuration.
pub fn validate_service_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base_path.starts_with('/') {
        errors.push(ValidationError::new("base_path", "must start with '/'"));
    }
    if config.base_path.contains(['?', '#']) {
        errors.push(ValidationError::new("base_path", "must not contain a query or fragment"));
    }
    check_template("encode_failure", &config.encode_failure, &mut errors);
    check_template("decode_failure", &config.decode_failure, &mut errors);
    check_template("timeout_failure", &config.timeout_failure, &mut errors);
    if config.max_body_size == 0 {
        errors.push(ValidationError::new("max_body_size", "must be greater than 0"));
    }
    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::new("request_timeout_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a client configuration.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::new("base_url", format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(url) if url.cannot_be_a_base() => {
            errors.push(ValidationError::new("base_url", "cannot be used as a base"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("base_url", e.to_string())),
    }
    if config.timeout_secs == 0 {
        errors.push(ValidationError::new("timeout_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
