//! Unified error type for the pgoapi client.

use pgoapi_protocol::ProtocolError;
use pgoapi_session::{ConfigError, SessionError, StatusError};
use pgoapi_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pgoapi` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PgoError {
    /// A transport-level error (proxy, network, interruption).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, missing return).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (login, bootstrap, call).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The backend declared a failure through the envelope status.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// A configuration document could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PgoError {
    /// `true` for failures where retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Session(err) => err.is_retryable(),
            Self::Status(status) => status.is_recoverable(),
            Self::Transport(TransportError::ProxyDead(_))
            | Self::Transport(TransportError::Request(_))
            | Self::Transport(TransportError::Interrupted(_)) => true,
            Self::Transport(_) | Self::Protocol(_) | Self::Config(_) => false,
        }
    }
}
