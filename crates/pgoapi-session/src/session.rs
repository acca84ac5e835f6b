//! The session: one authenticated identity talking to the backend.
//!
//! A [`Session`] owns everything one player's protocol conversation needs:
//! - WHO is talking (the [`CredentialProvider`])
//! - HOW calls are signed (the [`Signer`]) and carried (the [`Transport`])
//! - WHERE the player is (the current [`Location`] snapshot)
//! - WHAT the backend has issued (ticket, API URL, session hash)
//!
//! # Concurrency note
//!
//! Operations take `&mut self`. A session is a single conversation and
//! its ticket, URL, and location change in place, so the borrow checker
//! serializes calls per session for free. For concurrent traffic, run one
//! session per stream; proxy selection is a per-call argument, so many
//! sessions can share one transport without extra locking.

use std::sync::Arc;
use std::time::Duration;

use pgoapi_protocol::{
    AuthTicket, Codec, ProtobufCodec, Request, RequestEnvelope,
    ResponseEnvelope, ReturnSlot,
};
use pgoapi_transport::{CallContext, ProxySelector, Transport};
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::catalog;
use crate::debug::trace_message;
use crate::envelope::{Credentials, EnvelopeBuilder};
use crate::error::FormatError;
use crate::sink::Deliverable;
use crate::state::{SESSION_HASH_LEN, TicketState, now_ms};
use crate::{
    CredentialProvider, Location, NullSink, ResultSink, SessionConfig,
    SessionError, Signer,
};

// ---------------------------------------------------------------------------
// SessionBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`Session`].
///
/// # Example
///
/// ```rust,ignore
/// let session = Session::builder(provider, signer, transport, location)
///     .config(SessionConfig::default())
///     .sink(Arc::new(my_sink))
///     .build();
/// ```
pub struct SessionBuilder<P, S, T, C = ProtobufCodec> {
    provider: P,
    signer: S,
    transport: T,
    codec: C,
    location: Location,
    config: SessionConfig,
    sink: Arc<dyn ResultSink>,
}

impl<P, S, T, C> SessionBuilder<P, S, T, C>
where
    P: CredentialProvider,
    S: Signer,
    T: Transport,
    C: Codec,
{
    /// Sets the session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where decoded payloads are delivered. Defaults to
    /// [`NullSink`].
    pub fn sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the wire codec.
    pub fn codec<C2: Codec>(self, codec: C2) -> SessionBuilder<P, S, T, C2> {
        SessionBuilder {
            provider: self.provider,
            signer: self.signer,
            transport: self.transport,
            codec,
            location: self.location,
            config: self.config,
            sink: self.sink,
        }
    }

    /// Builds an unauthenticated session. Its signing epoch starts now.
    pub fn build(self) -> Session<P, S, T, C> {
        Session {
            config: self.config,
            provider: self.provider,
            signer: self.signer,
            transport: self.transport,
            codec: self.codec,
            sink: self.sink,
            location: Arc::new(self.location),
            state: TicketState::new(now_ms()),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A client session against the backend.
///
/// ## Lifecycle
///
/// ```text
/// build() ──→ initialize() ──→ call()/operations ──→ ... ──→ initialize()
///  [Unauthenticated]   [Authenticated, ticket renewed by any response]
/// ```
pub struct Session<P, S, T, C = ProtobufCodec> {
    pub(crate) config: SessionConfig,
    pub(crate) provider: P,
    pub(crate) signer: S,
    pub(crate) transport: T,
    pub(crate) codec: C,
    pub(crate) sink: Arc<dyn ResultSink>,
    pub(crate) location: Arc<Location>,
    pub(crate) state: TicketState,
}

impl<P, S, T> Session<P, S, T>
where
    P: CredentialProvider,
    S: Signer,
    T: Transport,
{
    /// Starts building a session with the default config, protobuf codec,
    /// and a [`NullSink`].
    pub fn builder(
        provider: P,
        signer: S,
        transport: T,
        location: Location,
    ) -> SessionBuilder<P, S, T> {
        SessionBuilder {
            provider,
            signer,
            transport,
            codec: ProtobufCodec,
            location,
            config: SessionConfig::default(),
            sink: Arc::new(NullSink),
        }
    }
}

impl<P, S, T, C> Session<P, S, T, C>
where
    P: CredentialProvider,
    S: Signer,
    T: Transport,
    C: Codec,
{
    // -- State queries ----------------------------------------------------

    /// `true` if there is no ticket or it has expired.
    ///
    /// Advisory only: calls are never blocked on it. Callers use it to
    /// decide when to [`initialize`](Self::initialize) again.
    pub fn is_expired(&self) -> bool {
        self.state.is_expired(now_ms())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn ticket(&self) -> Option<&AuthTicket> {
        self.state.ticket()
    }

    /// The endpoint the next call goes to.
    pub fn base_url(&self) -> &str {
        self.state.base_url().unwrap_or(&self.config.default_url)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // -- Local mutations ---------------------------------------------------

    /// Replaces the location snapshot. No network I/O: the new position is
    /// only reported by the next call.
    pub fn move_to(&mut self, location: impl Into<Arc<Location>>) {
        self.location = location.into();
        tracing::debug!(
            lat = self.location.lat(),
            lon = self.location.lon(),
            "moved"
        );
    }

    /// Sets the deadline applied to calls whose context carries none.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.config.call_timeout = timeout;
    }

    // -- Protocol ------------------------------------------------------------

    /// Logs in, bootstraps, and authenticates the session.
    ///
    /// Re-running it on an authenticated session starts over: a fresh
    /// login, session hash, signing epoch, and ticket. State is only
    /// replaced once the bootstrap response has been accepted, so a
    /// failed or interrupted initialization leaves the session as it was.
    ///
    /// # Errors
    /// - whatever the credential provider returns, unchanged
    /// - [`SessionError::Formatting`] if the hash or requests can't be built
    /// - transport errors (see [`call`](Self::call))
    /// - [`SessionError::NoUrl`] if the backend sent no API URL
    /// - [`SessionError::NoTicket`] if the backend sent no ticket
    pub async fn initialize(
        &mut self,
        ctx: &CallContext,
        proxy: ProxySelector,
    ) -> Result<(), SessionError> {
        let ctx = &ctx.clone().or_timeout(self.config.call_timeout);
        let token = ctx.guard(self.provider.login(ctx)).await??;

        let session_hash = generate_session_hash()?;
        let started_ms = now_ms();

        let requests =
            catalog::bootstrap_requests(&self.codec, &self.config.settings_hash)?;
        let envelope = self.envelope_builder().build(
            requests,
            Credentials::Raw {
                provider: self.provider.provider_id(),
                token,
            },
            started_ms,
        )?;

        let response = self.exchange(ctx, &envelope, proxy).await?;

        if response.api_url.is_empty() {
            tracing::warn!(
                status = response.status_code,
                "bootstrap response carried no api url"
            );
            return Err(SessionError::NoUrl);
        }
        let ticket = response.auth_ticket.ok_or(SessionError::NoTicket)?;
        let expires_ms = ticket.expire_timestamp_ms;

        self.state
            .establish(ticket, session_hash, started_ms, &response.api_url);

        tracing::info!(
            url = self.base_url(),
            expires_ms,
            provider = self.provider.provider_id(),
            "session initialized"
        );
        Ok(())
    }

    /// Sends `requests` in one signed envelope and returns the raw
    /// response.
    ///
    /// Authenticated sessions attach their ticket and a signature;
    /// unauthenticated ones attach the provider's raw auth info. After a
    /// successful exchange, a non-empty API URL redirects the session and
    /// (when authenticated) a returned ticket replaces the current one.
    ///
    /// # Errors
    /// - [`SessionError::Formatting`] before any I/O if serialization fails
    /// - [`SessionError::ProxyDead`] if the selected proxy is unreachable
    /// - [`SessionError::Request`] for any other transport failure
    /// - [`SessionError::Interrupted`] if `ctx` cancels or times out; the
    ///   session is left untouched
    pub async fn call(
        &mut self,
        ctx: &CallContext,
        requests: Vec<Request>,
        proxy: ProxySelector,
    ) -> Result<ResponseEnvelope, SessionError> {
        let envelope = self.build_envelope(requests)?;
        let response = self.exchange(ctx, &envelope, proxy).await?;
        self.absorb(&response);
        Ok(response)
    }

    // -- Internals ------------------------------------------------------------

    fn envelope_builder(&self) -> EnvelopeBuilder<'_, S, C> {
        EnvelopeBuilder {
            config: &self.config,
            signer: &self.signer,
            codec: &self.codec,
            location: &self.location,
        }
    }

    fn build_envelope(
        &self,
        requests: Vec<Request>,
    ) -> Result<RequestEnvelope, SessionError> {
        let credentials = match self.state.ticket() {
            Some(ticket) => Credentials::Ticket {
                ticket,
                session_hash: self.state.session_hash(),
                started_ms: self.state.started_ms(),
            },
            None => Credentials::Raw {
                provider: self.provider.provider_id(),
                token: self.provider.access_token(),
            },
        };
        self.envelope_builder().build(requests, credentials, now_ms())
    }

    /// One guarded transport exchange. Never mutates the session.
    async fn exchange(
        &self,
        ctx: &CallContext,
        envelope: &RequestEnvelope,
        proxy: ProxySelector,
    ) -> Result<ResponseEnvelope, SessionError> {
        let ctx = ctx.clone().or_timeout(self.config.call_timeout);
        let url = self.base_url();

        tracing::debug!(
            url,
            %proxy,
            requests = envelope.requests.len(),
            signed = !envelope.platform_requests.is_empty(),
            "dispatching envelope"
        );
        trace_message("request envelope", envelope);

        let result = ctx
            .guard(self.transport.exchange(&ctx, url, envelope, proxy))
            .await?;
        let response = result.map_err(|e| {
            let err = SessionError::from(e);
            if matches!(err, SessionError::ProxyDead(_)) {
                tracing::warn!(%proxy, "proxy dead");
            } else {
                tracing::debug!(%proxy, error = %err, "exchange failed");
            }
            err
        })?;

        trace_message("response envelope", &response);
        Ok(response)
    }

    /// Applies the opportunistic updates any response may carry.
    fn absorb(&mut self, response: &ResponseEnvelope) {
        if self.state.redirect(&response.api_url) {
            tracing::info!(url = self.base_url(), "api url updated");
        }
        if let Some(ticket) = &response.auth_ticket {
            if self.state.renew(ticket.clone()) {
                tracing::info!(
                    expires_ms = ticket.expire_timestamp_ms,
                    "auth ticket renewed"
                );
            }
        }
    }

    /// Decodes `slot` out of `response` and pushes it to the sink.
    pub(crate) fn deliver<M: Deliverable>(
        &self,
        slot: ReturnSlot<M>,
        response: &ResponseEnvelope,
    ) -> Result<M, SessionError> {
        let payload = slot.decode(response).map_err(SessionError::Response)?;
        trace_message(std::any::type_name::<M>(), &payload);
        self.sink.push(payload.clone().into_decoded());
        Ok(payload)
    }
}

/// Fresh random session hash from the OS random source.
fn generate_session_hash() -> Result<[u8; SESSION_HASH_LEN], SessionError> {
    let mut hash = [0u8; SESSION_HASH_LEN];
    OsRng.try_fill_bytes(&mut hash).map_err(|e| {
        SessionError::Formatting(FormatError::Entropy(e.to_string()))
    })?;
    Ok(hash)
}
