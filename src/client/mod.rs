//! Client subsystem: the typed counterpart of a registered route.
//!
//! # Data Flow
//! ```text
//! request value
//!     → codec (encode)            ── fail → TransportError::Encode
//!     → base URL + route path
//!     → reqwest (POST / GET)      ── fail → TransportError::Request
//!     → 200: codec (decode)       ── fail → TransportError::Decode
//!     → any other status: decode_wire_error + stamp status → InvokeError::Remote
//! ```

pub mod error;
pub mod invoker;

pub use error::{ClientError, InvokeError, TransportError};
pub use invoker::{decode_response, Call, Client, CREDENTIALS_HEADER};
