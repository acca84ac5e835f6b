use crate::ProxySelector;

/// Why a guarded call stopped before its future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    /// The caller fired the call's [`CancelHandle`](crate::CancelHandle).
    #[error("call cancelled")]
    Cancelled,

    /// The call's deadline passed.
    #[error("call deadline exceeded")]
    DeadlineExceeded,
}

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The selected proxy could not be reached. Distinct from
    /// [`Request`](Self::Request) so callers can rotate proxies.
    #[error("proxy {0} unavailable")]
    ProxyDead(ProxySelector),

    /// Any other network failure (DNS, connect, TLS, read).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("unexpected http status {0}")]
    Status(u16),

    /// The exchange was cancelled or ran past its deadline.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}
