//! Error types for the protocol layer.
//!
//! Each pgoapi crate defines its own error enum. A `ProtocolError` always
//! means "the bytes and the schema disagree", never a network problem or
//! a session-state problem.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    ///
    /// With a growable buffer prost can only fail here if the message is
    /// larger than the buffer can hold, but the error is still surfaced
    /// so the session can abort the call before any network I/O.
    #[error("encode failed: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Deserialization failed (turning bytes into a message).
    ///
    /// Common causes: truncated bytes, a wire type that doesn't match the
    /// field's declared type, or invalid UTF-8 in a string field.
    #[error("decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A response envelope carried fewer returns than the operation
    /// expected. `index` is the slot that was requested, `len` is how many
    /// returns actually arrived.
    #[error("missing return at index {index} (response carried {len})")]
    MissingReturn { index: usize, len: usize },

    /// Rendering a message as JSON for a debug dump failed.
    #[cfg(feature = "json")]
    #[error("json rendering failed: {0}")]
    Json(#[from] serde_json::Error),
}
