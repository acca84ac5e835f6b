//! Envelope types for the backend's wire format.
//!
//! Everything in this module is "on the wire": the field numbers and wire
//! types are fixed by the upstream schema and checked by the remote
//! service. Field names follow the schema, but the tags are what matter:
//! never renumber a field.
//!
//! All messages derive [`prost::Message`] (binary encoding) and
//! [`serde::Serialize`] (JSON rendering for debug dumps only; the JSON form
//! never travels on the wire).

use std::marker::PhantomData;

use prost::Message;
use serde::Serialize;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// The kind of a game-level sub-request.
///
/// Enum fields are carried as `i32` on the messages (prost's convention);
/// use `RequestType::try_from(raw)` to get the typed value back.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    prost::Enumeration,
)]
#[repr(i32)]
pub enum RequestType {
    MethodUnset = 0,
    GetPlayer = 2,
    GetInventory = 4,
    DownloadSettings = 5,
    Encounter = 102,
    GetMapObjects = 106,
    GetHatchedEggs = 126,
    CheckAwardedBadges = 129,
    CheckChallenge = 600,
    VerifyChallenge = 601,
}

/// The kind of a platform-level request (attached next to the game
/// sub-requests, not part of the positional return sequence).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    prost::Enumeration,
)]
#[repr(i32)]
pub enum PlatformRequestType {
    Unset = 0,
    SendEncryptedSignature = 6,
}

/// Envelope-level status code returned by the backend.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    prost::Enumeration,
)]
#[repr(i32)]
pub enum StatusCode {
    Unknown = 0,
    Ok = 1,
    OkRpcUrlInResponse = 2,
    BadRequest = 3,
    InvalidRequest = 51,
    InvalidPlatformRequest = 52,
    Redirect = 53,
    SessionInvalidated = 100,
    InvalidAuthToken = 102,
}

// ---------------------------------------------------------------------------
// Tickets and auth info
// ---------------------------------------------------------------------------

/// Opaque session credential issued by the backend.
///
/// `start` and `end` are opaque; only `expire_timestamp_ms` is interpreted
/// client-side.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct AuthTicket {
    #[prost(bytes = "vec", tag = "1")]
    pub start: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub expire_timestamp_ms: u64,
    #[prost(bytes = "vec", tag = "3")]
    pub end: Vec<u8>,
}

/// Raw credential sent before the backend has issued a ticket.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct AuthInfo {
    #[prost(string, tag = "1")]
    pub provider: String,
    #[prost(message, optional, tag = "2")]
    pub token: Option<Jwt>,
}

/// The provider's access token as carried inside [`AuthInfo`].
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Jwt {
    #[prost(string, tag = "1")]
    pub contents: String,
    #[prost(int32, tag = "2")]
    pub unknown2: i32,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One game-level sub-request.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Request {
    #[prost(enumeration = "RequestType", tag = "1")]
    pub request_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub request_message: Vec<u8>,
}

impl Request {
    /// A sub-request with no parameter message.
    pub fn bare(kind: RequestType) -> Self {
        Self {
            request_type: kind as i32,
            request_message: Vec::new(),
        }
    }

    /// A sub-request carrying an already-serialized parameter message.
    pub fn with_message(kind: RequestType, message: Vec<u8>) -> Self {
        Self {
            request_type: kind as i32,
            request_message: message,
        }
    }

    /// Returns the typed request kind, or `None` for values this client
    /// doesn't know.
    pub fn kind(&self) -> Option<RequestType> {
        RequestType::try_from(self.request_type).ok()
    }
}

/// One platform-level request (e.g. the encrypted signature).
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PlatformRequest {
    #[prost(enumeration = "PlatformRequestType", tag = "1")]
    pub request_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub request_message: Vec<u8>,
}

/// One outbound RPC round trip.
///
/// Exactly one of `auth_ticket` / `auth_info` is set by the session: the
/// ticket once the session is authenticated, the raw credential before.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct RequestEnvelope {
    #[prost(int32, tag = "1")]
    pub status_code: i32,
    #[prost(uint64, tag = "3")]
    pub request_id: u64,
    #[prost(message, repeated, tag = "4")]
    pub requests: Vec<Request>,
    #[prost(message, repeated, tag = "6")]
    pub platform_requests: Vec<PlatformRequest>,
    #[prost(double, tag = "7")]
    pub latitude: f64,
    #[prost(double, tag = "8")]
    pub longitude: f64,
    #[prost(double, tag = "9")]
    pub accuracy: f64,
    #[prost(message, optional, tag = "10")]
    pub auth_info: Option<AuthInfo>,
    #[prost(message, optional, tag = "11")]
    pub auth_ticket: Option<AuthTicket>,
    #[prost(int64, tag = "12")]
    pub ms_since_last_locationfix: i64,
}

impl RequestEnvelope {
    /// Returns the platform requests of the given kind.
    pub fn platform_requests_of(
        &self,
        kind: PlatformRequestType,
    ) -> impl Iterator<Item = &PlatformRequest> {
        self.platform_requests
            .iter()
            .filter(move |r| r.request_type == kind as i32)
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One platform-level response.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PlatformResponse {
    #[prost(enumeration = "PlatformRequestType", tag = "1")]
    pub response_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub response: Vec<u8>,
}

/// One inbound RPC round trip.
///
/// `returns` is positionally aligned with the outbound `requests`: the
/// bytes at index `i` answer the sub-request at index `i`.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct ResponseEnvelope {
    #[prost(enumeration = "StatusCode", tag = "1")]
    pub status_code: i32,
    #[prost(uint64, tag = "2")]
    pub request_id: u64,
    #[prost(string, tag = "3")]
    pub api_url: String,
    #[prost(message, repeated, tag = "6")]
    pub platform_returns: Vec<PlatformResponse>,
    #[prost(message, optional, tag = "7")]
    pub auth_ticket: Option<AuthTicket>,
    #[prost(bytes = "vec", repeated, tag = "100")]
    pub returns: Vec<Vec<u8>>,
    #[prost(string, tag = "101")]
    pub error: String,
}

impl ResponseEnvelope {
    /// Decodes the return at `index` as message type `M`.
    ///
    /// # Errors
    /// - [`ProtocolError::MissingReturn`] if the envelope is too short
    /// - [`ProtocolError::Decode`] if the bytes don't parse as `M`
    pub fn decode_return<M: Message + Default>(
        &self,
        index: usize,
    ) -> Result<M, ProtocolError> {
        let bytes =
            self.returns
                .get(index)
                .ok_or(ProtocolError::MissingReturn {
                    index,
                    len: self.returns.len(),
                })?;
        Ok(M::decode(bytes.as_slice())?)
    }
}

// ---------------------------------------------------------------------------
// ReturnSlot
// ---------------------------------------------------------------------------

/// A typed position in a response's return sequence.
///
/// Operations declare their results as `ReturnSlot` constants (e.g. "the
/// map objects live at index 6 and are a `GetMapObjectsResponse`") so the
/// index arithmetic lives in exactly one place per operation.
pub struct ReturnSlot<M> {
    index: usize,
    _message: PhantomData<fn() -> M>,
}

impl<M> ReturnSlot<M> {
    /// Declares a slot at `index`.
    pub const fn at(index: usize) -> Self {
        Self {
            index,
            _message: PhantomData,
        }
    }

    /// The position this slot reads from.
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<M: Message + Default> ReturnSlot<M> {
    /// Decodes this slot's message out of `response`.
    pub fn decode(
        &self,
        response: &ResponseEnvelope,
    ) -> Result<M, ProtocolError> {
        response.decode_return(self.index)
    }
}

// Manual impls: `derive` would demand `M: Clone`/`M: Debug`, which the
// slot itself doesn't need.
impl<M> Clone for ReturnSlot<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for ReturnSlot<M> {}

impl<M> std::fmt::Debug for ReturnSlot<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnSlot")
            .field("index", &self.index)
            .field("message", &std::any::type_name::<M>())
            .finish()
    }
}
