//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The wire format is fixed (protobuf, field-numbered), so there is one
//! real codec: [`ProtobufCodec`]. The [`Codec`] trait still sits in front
//! of it so tests can swap in a codec that fails on demand and exercise
//! the session's "abort before any network I/O" path.
//!
//! With the `json` feature (default) [`to_debug_json`] renders any wire
//! message as indented JSON for trace-level dumps.

use prost::Message;

use crate::ProtocolError;

/// A codec that can encode wire messages to bytes and decode them back.
///
/// `Send + Sync + 'static` so a codec can live inside a session that is
/// moved across Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a message.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected message.
    fn decode<M: Message + Default>(
        &self,
        data: &[u8],
    ) -> Result<M, ProtocolError>;
}

// ---------------------------------------------------------------------------
// ProtobufCodec
// ---------------------------------------------------------------------------

/// The backend's binary wire format, via `prost`.
///
/// ```rust
/// use pgoapi_protocol::{Codec, ProtobufCodec, AuthTicket};
///
/// let codec = ProtobufCodec;
/// let ticket = AuthTicket {
///     start: vec![1, 2, 3],
///     expire_timestamp_ms: 1_700_000_000_000,
///     end: vec![4, 5],
/// };
///
/// let bytes = codec.encode(&ticket).unwrap();
/// let decoded: AuthTicket = codec.decode(&bytes).unwrap();
/// assert_eq!(ticket, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl Codec for ProtobufCodec {
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = Vec::with_capacity(message.encoded_len());
        message.encode(&mut buf)?;
        Ok(buf)
    }

    fn decode<M: Message + Default>(
        &self,
        data: &[u8],
    ) -> Result<M, ProtocolError> {
        Ok(M::decode(data)?)
    }
}

// ---------------------------------------------------------------------------
// JSON debug rendering
// ---------------------------------------------------------------------------

/// Renders a message as tab-indented JSON.
///
/// For logs only; the backend never sees this form.
#[cfg(feature = "json")]
pub fn to_debug_json<T: serde::Serialize>(
    value: &T,
) -> Result<String, ProtocolError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GetMapObjectsMessage, Request, RequestEnvelope, RequestType,
    };

    #[test]
    fn test_encode_decode_envelope_preserves_request_order() {
        let codec = ProtobufCodec;
        let env = RequestEnvelope {
            request_id: 42,
            requests: vec![
                Request::bare(RequestType::GetPlayer),
                Request::bare(RequestType::GetHatchedEggs),
                Request::with_message(RequestType::GetInventory, vec![8, 1]),
            ],
            latitude: 40.0,
            longitude: -74.0,
            ..Default::default()
        };

        let bytes = codec.encode(&env).expect("encode");
        let back: RequestEnvelope = codec.decode(&bytes).expect("decode");

        let kinds: Vec<_> = back.requests.iter().map(Request::kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(RequestType::GetPlayer),
                Some(RequestType::GetHatchedEggs),
                Some(RequestType::GetInventory),
            ]
        );
        assert_eq!(back, env);
    }

    #[test]
    fn test_decode_truncated_bytes_is_decode_error() {
        let codec = ProtobufCodec;
        let result = codec.decode::<GetMapObjectsMessage>(&[0x0a, 0x05]);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_debug_json_uses_tab_indent() {
        let msg = GetMapObjectsMessage {
            cell_id: vec![1, 2],
            since_timestamp_ms: vec![0, 0],
            latitude: 1.5,
            longitude: 2.5,
        };

        let json = to_debug_json(&msg).expect("render");

        assert!(json.contains("\n\t\"cell_id\""));
        assert!(json.contains("\"latitude\": 1.5"));
    }
}
