//! JSON codec shared by the dispatcher and the client.

use axum::body::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::wire::error::WireError;

/// Message placed in a WireError whose body could not be decoded.
pub const UNDECODABLE_ERROR_MESSAGE: &str = "The remote service returned an error body that could not be decoded.";

/// Errors produced while encoding or decoding payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Payload was malformed or did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize a value into a JSON body.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CodecError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(CodecError::Encode)
}

/// Deserialize a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Decode a failure body.
///
/// Never fails: a body that is not a WireError yields one carrying the
/// transport `status`, a fixed message and the raw body as internal detail.
pub fn decode_wire_error(bytes: &[u8], status: u16) -> WireError {
    match decode::<WireError>(bytes) {
        Ok(wire) => wire,
        Err(e) => {
            tracing::debug!(status, error = %e, "Error body is not a wire error");
            WireError {
                internal: String::from_utf8_lossy(bytes).into_owned(),
                message: UNDECODABLE_ERROR_MESSAGE.to_string(),
                code: status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Division {
        #[serde(rename = "Top")]
        top: i64,
        #[serde(rename = "Bottom")]
        bottom: i64,
        note: Option<String>,
        tags: Vec<String>,
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let original = Division {
            top: -4,
            bottom: 2,
            note: Some("ünïcode".into()),
            tags: vec!["a".into(), String::new()],
        };
        let bytes = encode(&original).unwrap();
        let decoded: Division = decode(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let err = decode::<Division>(br#"{"Top": "four"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));

        let err = decode::<Division>(b"{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_encode_unsupported_map_key() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, CodecError::Encode(_)));
    }

    #[test]
    fn test_decode_wire_error() {
        let wire = decode_wire_error(br#"{"internal":"","message":"nope","code":422}"#, 422);
        assert_eq!(wire, WireError::new(422, "nope"));
    }

    #[test]
    fn test_decode_wire_error_fallback_keeps_status() {
        let wire = decode_wire_error(b"Bad Gateway", 502);
        assert_eq!(wire.code, 502);
        assert_eq!(wire.message, UNDECODABLE_ERROR_MESSAGE);
        assert_eq!(wire.internal, "Bad Gateway");

        let wire = decode_wire_error(b"", 408);
        assert_eq!(wire.code, 408);
    }
}
