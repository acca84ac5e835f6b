//! Transport abstraction layer for pgoapi.
//!
//! Provides the [`Transport`] trait (one envelope exchange per call), the
//! [`ProxySelector`] that routes it, and the [`CallContext`] that can
//! cancel it. Concrete HTTP execution lives outside this workspace; the
//! session only ever talks to the trait.

mod context;
mod error;

pub use context::{CallContext, CancelHandle, CancelSignal};
pub use error::{Interrupted, TransportError};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use pgoapi_protocol::{RequestEnvelope, ResponseEnvelope};

/// Caller-chosen index of the outbound network path for one exchange.
///
/// Negative values mean "no proxy, connect directly". The selector is a
/// per-call argument, never session state, so one session can rotate
/// proxies call by call without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxySelector(i64);

impl ProxySelector {
    /// Connect without a proxy.
    pub const DIRECT: Self = Self(-1);

    /// Creates a selector from a raw index.
    pub fn new(index: i64) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    pub fn into_inner(self) -> i64 {
        self.0
    }

    /// Returns the proxy index, or `None` for a direct connection.
    pub fn proxy_index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    pub fn is_direct(self) -> bool {
        self.0 < 0
    }
}

impl Default for ProxySelector {
    fn default() -> Self {
        Self::DIRECT
    }
}

impl From<i64> for ProxySelector {
    fn from(index: i64) -> Self {
        Self(index)
    }
}

impl fmt::Display for ProxySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.proxy_index() {
            Some(index) => write!(f, "proxy-{index}"),
            None => f.write_str("direct"),
        }
    }
}

/// Executes one request/response envelope exchange.
///
/// # Contract
///
/// - `base_url` is the full RPC endpoint for this call.
/// - An unreachable proxy must be reported as
///   [`TransportError::ProxyDead`], never folded into
///   [`TransportError::Request`].
/// - Implementations should honor `ctx` (the session also guards the
///   returned future with it, so ignoring it is safe but wasteful).
pub trait Transport: Send + Sync + 'static {
    fn exchange(
        &self,
        ctx: &CallContext,
        base_url: &str,
        envelope: &RequestEnvelope,
        proxy: ProxySelector,
    ) -> impl Future<Output = Result<ResponseEnvelope, TransportError>> + Send;
}

/// Lets many sessions share one transport (and its connection pool).
impl<T: Transport> Transport for Arc<T> {
    fn exchange(
        &self,
        ctx: &CallContext,
        base_url: &str,
        envelope: &RequestEnvelope,
        proxy: ProxySelector,
    ) -> impl Future<Output = Result<ResponseEnvelope, TransportError>> + Send {
        (**self).exchange(ctx, base_url, envelope, proxy)
    }
}
