//! The canonical error envelope and the capability business errors implement.

use std::convert::Infallible;
use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error payload exchanged on every failed call.
///
/// `code` duplicates the HTTP status so a caller that only sees the body can
/// still branch on it. `internal` carries diagnostic detail a service may scrub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    #[serde(default)]
    pub internal: String,
    #[serde(default)]
    pub message: String,
    pub code: u16,
}

impl WireError {
    /// Create an error with an empty internal detail.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            internal: String::new(),
            message: message.into(),
            code,
        }
    }

    /// Attach diagnostic detail.
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal = internal.into();
        self
    }

    /// Whether `code` is a status that can be written with this error as its body.
    ///
    /// Informational codes and the bodyless 204, 205 and 304 are rejected.
    pub fn has_valid_code(&self) -> bool {
        can_carry_body(self.code)
    }

    /// The HTTP status for this error, 500 when `code` cannot carry the body.
    pub fn status(&self) -> StatusCode {
        if !self.has_valid_code() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Whether a response with status `code` may have a body.
pub fn can_carry_body(code: u16) -> bool {
    (200..=599).contains(&code) && !matches!(code, 204 | 205 | 304)
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "status {}", self.code)
        } else {
            write!(f, "{} (status {})", self.message, self.code)
        }
    }
}

impl std::error::Error for WireError {}

/// Capability every business error must provide: an HTTP status code.
///
/// The caller-facing message is the error's `Display` output. Whatever the
/// concrete type, it crosses the wire as a [`WireError`].
pub trait HttpError: fmt::Display + Send + 'static {
    /// HTTP status code for this error.
    fn code(&self) -> u16;

    /// Diagnostic detail placed in `WireError::internal`.
    fn internal(&self) -> Option<String> {
        None
    }

    fn to_wire(&self) -> WireError {
        WireError {
            internal: self.internal().unwrap_or_default(),
            message: self.to_string(),
            code: self.code(),
        }
    }
}

impl HttpError for WireError {
    fn code(&self) -> u16 {
        self.code
    }

    fn internal(&self) -> Option<String> {
        Some(self.internal.clone())
    }

    // Display decorates the message, so copy fields instead.
    fn to_wire(&self) -> WireError {
        self.clone()
    }
}

impl HttpError for Box<dyn HttpError> {
    fn code(&self) -> u16 {
        (**self).code()
    }

    fn internal(&self) -> Option<String> {
        (**self).internal()
    }

    fn to_wire(&self) -> WireError {
        (**self).to_wire()
    }
}

impl HttpError for Infallible {
    fn code(&self) -> u16 {
        match *self {}
    }
}

/// Request or response shape carrying no data, encoded as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unprocessable;

    impl fmt::Display for Unprocessable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Impossible to divide by Zero")
        }
    }

    impl HttpError for Unprocessable {
        fn code(&self) -> u16 {
            422
        }
    }

    #[test]
    fn test_custom_error_to_wire() {
        let wire = Unprocessable.to_wire();
        assert_eq!(wire.code, 422);
        assert_eq!(wire.message, "Impossible to divide by Zero");
        assert!(wire.internal.is_empty());
    }

    #[test]
    fn test_boxed_error_delegates() {
        let boxed: Box<dyn HttpError> = Box::new(WireError::new(409, "taken").with_internal("row 7"));
        let wire = boxed.to_wire();
        assert_eq!(wire, WireError::new(409, "taken").with_internal("row 7"));
    }

    #[test]
    fn test_empty_fields_present_on_wire() {
        let json = serde_json::to_value(WireError::new(500, "")).unwrap();
        assert_eq!(json, serde_json::json!({"internal": "", "message": "", "code": 500}));
    }

    #[test]
    fn test_status_falls_back_on_invalid_code() {
        assert_eq!(WireError::new(422, "x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(WireError::new(42, "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(WireError::new(700, "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bodyless_codes_rejected() {
        for code in [100, 101, 199, 204, 205, 304] {
            let wire = WireError::new(code, "x");
            assert!(!wire.has_valid_code(), "{} accepted", code);
            assert_eq!(wire.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        for code in [200, 202, 302, 404, 599] {
            assert!(WireError::new(code, "x").has_valid_code(), "{} rejected", code);
        }
    }

    #[test]
    fn test_empty_encodes_as_object() {
        assert_eq!(serde_json::to_string(&Empty {}).unwrap(), "{}");
    }
}
