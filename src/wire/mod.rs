//! Wire protocol subsystem.
//!
//! # Data Flow
//! ```text
//! Server side:
//!     business value  → codec.rs (encode) → 200 + JSON body
//!     business error  → error.rs (HttpError → WireError) → status + JSON body
//!
//! Client side:
//!     200 + JSON body      → codec.rs (decode into response shape)
//!     status + JSON body   → codec.rs (decode_wire_error) → WireError
//! ```
//!
//! # Design Decisions
//! - JSON is the only payload format; both sides share the same codec
//! - The server only ever emits the WireError shape for failures
//! - Decoding a WireError never fails; a malformed body still yields a status

pub mod codec;
pub mod error;

pub use codec::{decode, decode_wire_error, encode, CodecError};
pub use error::{Empty, HttpError, WireError};
