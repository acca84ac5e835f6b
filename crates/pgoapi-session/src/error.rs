//! Error types for the session layer.
//!
//! Every failure a session operation can produce is one variant of
//! [`SessionError`], and every variant that has an underlying cause
//! carries it. Nothing here is retried internally: all of these go back
//! to the immediate caller.
//!
//! A challenge is deliberately *not* an error. It arrives as a decoded
//! result (see [`Challenge`](crate::Challenge)) and the caller branches on
//! it.

use pgoapi_protocol::ProtocolError;
use pgoapi_transport::{Interrupted, ProxySelector, TransportError};

use crate::StatusError;

/// Local failure while preparing a call. Always fatal to the call.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A wire message could not be serialized.
    #[error(transparent)]
    Encode(ProtocolError),

    /// The OS random source failed while generating the session hash.
    #[error("random source failed: {0}")]
    Entropy(String),
}

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The credential provider rejected the login. Produced by
    /// [`CredentialProvider`](crate::CredentialProvider) implementations
    /// and surfaced unchanged.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Serialization or random generation failed before any network I/O.
    #[error("formatting failed: {0}")]
    Formatting(#[source] FormatError),

    /// The bootstrap call succeeded but the backend sent no API URL.
    /// Without one no further call can be routed, so this is fatal to
    /// initialization.
    #[error("backend returned no api url")]
    NoUrl,

    /// The bootstrap call succeeded but the backend sent no ticket.
    #[error("backend returned no auth ticket")]
    NoTicket,

    /// The selected proxy is unreachable. Rotate and retry.
    #[error("proxy {0} is dead")]
    ProxyDead(ProxySelector),

    /// Any other transport failure. Safe to retry.
    #[error("request failed: {0}")]
    Request(#[source] TransportError),

    /// The call was cancelled or ran out of time. Session state was left
    /// untouched.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    /// A return was missing or failed to decode.
    #[error("bad response: {0}")]
    Response(#[source] ProtocolError),

    /// The backend's envelope status code declared a failure.
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl SessionError {
    pub(crate) fn encode(err: ProtocolError) -> Self {
        Self::Formatting(FormatError::Encode(err))
    }

    /// `true` for failures where retrying the same call may succeed
    /// (after rotating proxies, re-authenticating, or waiting).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProxyDead(_) | Self::Request(_) | Self::Interrupted(_) => {
                true
            }
            Self::Status(status) => status.is_recoverable(),
            Self::AuthFailed(_)
            | Self::Formatting(_)
            | Self::NoUrl
            | Self::NoTicket
            | Self::Response(_) => false,
        }
    }
}

impl From<TransportError> for SessionError {
    /// Splits transport failures into the categories callers branch on:
    /// dead proxies and interruptions keep their own variants, everything
    /// else is a generic request failure.
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::ProxyDead(proxy) => Self::ProxyDead(proxy),
            TransportError::Interrupted(reason) => Self::Interrupted(reason),
            other => Self::Request(other),
        }
    }
}
