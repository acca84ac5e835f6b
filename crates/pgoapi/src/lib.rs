//! # pgoapi
//!
//! Client for the game service's RPC protocol.
//!
//! A [`Session`](prelude::Session) authenticates through a credential
//! provider, signs every call through a signer, and sends envelopes
//! through a transport you supply. Operations return typed payloads and
//! push each one to a result sink.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pgoapi::prelude::*;
//!
//! // Implement CredentialProvider, Signer, and Transport, then:
//! // let mut session = Session::builder(provider, signer, transport, location)
//! //     .config(SessionConfig::default())
//! //     .build();
//! // session.initialize(&CallContext::background(), ProxySelector::DIRECT).await?;
//! // let reply = session.announce(&CallContext::background(), ProxySelector::DIRECT).await?;
//! ```

mod error;
pub mod logging;

pub use error::PgoError;

pub use pgoapi_protocol as protocol;
pub use pgoapi_session as session;
pub use pgoapi_transport as transport;

/// Everything a typical client needs.
pub mod prelude {
    pub use crate::PgoError;

    pub use pgoapi_protocol::{
        AuthTicket, Codec, GetInventoryResponse, GetMapObjectsResponse,
        GetPlayerResponse, ProtobufCodec, Request, RequestEnvelope,
        RequestType, ResponseEnvelope,
    };
    pub use pgoapi_session::{
        Announcement, Challenge, ChannelSink, CredentialProvider, Decoded,
        Location, NullSink, Reply, ResultSink, Session, SessionConfig,
        SessionError, Signer, StatusClass, StatusError,
    };
    pub use pgoapi_transport::{
        CallContext, CancelHandle, Interrupted, ProxySelector, Transport,
        TransportError,
    };
}
