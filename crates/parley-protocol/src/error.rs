//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes or the fields on the wire were
//! wrong. It never describes a networking failure (that is
//! `TransportError`) or a rejected chat operation.

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a frame into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `method`,
    /// missing fields, or wrong types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A timestamp string did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[source] chrono::ParseError),
}
