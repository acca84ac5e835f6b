//! Credential provider hook.
//!
//! The session doesn't log players in itself. A [`CredentialProvider`]
//! (Google, PTC, or a test double) turns configured credentials into an
//! access token; the session forwards that token as raw auth info on its
//! first call, until the backend hands out a ticket.

use std::future::Future;

use pgoapi_transport::CallContext;

use crate::SessionError;

/// Produces the access token the session authenticates with.
///
/// `Send + Sync + 'static` because the provider lives inside the session
/// for as long as the session does.
///
/// # Example
///
/// ```rust
/// use pgoapi_session::{CredentialProvider, SessionError};
/// use pgoapi_transport::CallContext;
///
/// /// Hands out a token fixed at construction. Fine for tests.
/// struct StaticToken(String);
///
/// impl CredentialProvider for StaticToken {
///     async fn login(&self, _ctx: &CallContext) -> Result<String, SessionError> {
///         if self.0.is_empty() {
///             return Err(SessionError::AuthFailed("no token configured".into()));
///         }
///         Ok(self.0.clone())
///     }
///
///     fn provider_id(&self) -> &str {
///         "ptc"
///     }
///
///     fn access_token(&self) -> String {
///         self.0.clone()
///     }
/// }
/// ```
pub trait CredentialProvider: Send + Sync + 'static {
    /// Performs the login and returns the fresh access token.
    ///
    /// May do its own network I/O and its own retries. Failures should be
    /// reported as [`SessionError::AuthFailed`]; the session passes them
    /// through unchanged.
    fn login(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<String, SessionError>> + Send;

    /// Identifier of the login provider as the backend expects it
    /// (e.g. `"google"`, `"ptc"`).
    fn provider_id(&self) -> &str;

    /// The most recent access token. Read on every unauthenticated call.
    fn access_token(&self) -> String;
}
