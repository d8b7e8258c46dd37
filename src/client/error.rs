//! Client-side error types.

use std::fmt;

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

use crate::config::ConfigError;
use crate::wire::{CodecError, WireError};

/// Failure to construct a [`Client`](crate::client::Client).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

/// A call that never completed a valid exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request value could not be encoded; nothing was sent.
    #[error("failed to encode request: {0}")]
    Encode(#[source] CodecError),

    /// Token is not a valid header value.
    #[error("invalid authorization token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),

    /// Connection, timeout or protocol failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The remote claimed success but the body did not match the response shape.
    #[error("failed to decode successful response: {0}")]
    Decode(#[source] CodecError),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Request(e) | TransportError::Body(e) if e.is_timeout())
    }
}

/// Failure of a typed call.
///
/// `Remote` holds the structured error the service answered with, reconstructed
/// into the caller's error type `E`.
#[derive(Debug)]
pub enum InvokeError<E = WireError> {
    Remote(E),
    Transport(TransportError),
}

impl<E> InvokeError<E> {
    pub fn remote(&self) -> Option<&E> {
        match self {
            InvokeError::Remote(e) => Some(e),
            InvokeError::Transport(_) => None,
        }
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            InvokeError::Remote(_) => None,
            InvokeError::Transport(e) => Some(e),
        }
    }

    pub fn into_remote(self) -> Option<E> {
        match self {
            InvokeError::Remote(e) => Some(e),
            InvokeError::Transport(_) => None,
        }
    }
}

impl<E> From<TransportError> for InvokeError<E> {
    fn from(e: TransportError) -> Self {
        InvokeError::Transport(e)
    }
}

impl<E: fmt::Display> fmt::Display for InvokeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Remote(e) => write!(f, "remote error: {}", e),
            InvokeError::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for InvokeError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokeError::Remote(_) => None,
            InvokeError::Transport(e) => Some(e),
        }
    }
}
