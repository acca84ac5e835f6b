//! Wire protocol for the pgoapi RPC client.
//!
//! This crate defines the "language" the client and the backend speak:
//!
//! - **Envelopes** ([`RequestEnvelope`], [`ResponseEnvelope`], [`Request`],
//!   [`AuthTicket`]): the outer containers for one RPC round trip.
//! - **Messages** ([`GetMapObjectsMessage`], [`CheckChallengeResponse`], ...):
//!   typed sub-request parameters and sub-responses.
//! - **Signature** ([`Signature`]): the per-call integrity bundle.
//! - **Codec** ([`Codec`] trait, [`ProtobufCodec`]): bytes in, bytes out.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer knows nothing about connections, tickets, or
//! retries. It only knows the schema.
//!
//! ```text
//! Transport (envelopes over the network) → Protocol (schema) ← Session (state)
//! ```

mod codec;
mod error;
mod messages;
mod signature;
mod types;

pub use codec::{Codec, ProtobufCodec};
#[cfg(feature = "json")]
pub use codec::to_debug_json;
pub use error::ProtocolError;
pub use messages::{
    CheckChallengeResponse, Currency, DownloadSettingsMessage,
    EncounterMessage, EncounterResponse, GetInventoryMessage,
    GetInventoryResponse, GetMapObjectsMessage, GetMapObjectsResponse,
    GetPlayerResponse, InventoryDelta, InventoryItem, MapCell, PlayerData,
    SendEncryptedSignatureRequest, VerifyChallengeMessage,
    VerifyChallengeResponse,
};
pub use signature::{ActivityStatus, DeviceInfo, Signature};
pub use types::{
    AuthInfo, AuthTicket, Jwt, PlatformRequest, PlatformRequestType,
    PlatformResponse, Request, RequestEnvelope, RequestType, ResponseEnvelope,
    ReturnSlot, StatusCode,
};

// Re-exported so downstream crates can call `encode_to_vec`/`decode` on
// wire types without naming prost in their own manifests.
pub use prost::Message;
