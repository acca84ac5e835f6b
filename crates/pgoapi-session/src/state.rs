//! The session's mutable protocol state and its transitions.
//!
//! Ticket, base URL, session hash, and signing epoch are the only fields
//! that change over a session's life. They live together in
//! [`TicketState`] and change only through the methods below, so every
//! transition of the state machine is visible in one file.
//!
//! ```text
//!                 establish()
//!   Unauthenticated ─────────→ Authenticated ──┐
//!         ▲                        ▲           │ renew()
//!         │ (establish again       └───────────┘
//!         │  replaces everything)
//! ```
//!
//! Expiry never changes the state. [`TicketState::is_expired`] is a
//! predicate callers use to decide when to re-initialize.

use std::time::{SystemTime, UNIX_EPOCH};

use pgoapi_protocol::AuthTicket;

/// Length of the random session hash.
pub const SESSION_HASH_LEN: usize = 32;

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub(crate) struct TicketState {
    /// `Some` exactly when the session is authenticated.
    ticket: Option<AuthTicket>,
    /// Redirected endpoint. `None` means "use the configured default".
    base_url: Option<String>,
    session_hash: [u8; SESSION_HASH_LEN],
    started_ms: u64,
}

impl TicketState {
    /// A fresh, unauthenticated state whose signing epoch is `started_ms`.
    pub(crate) fn new(started_ms: u64) -> Self {
        Self {
            ticket: None,
            base_url: None,
            session_hash: [0; SESSION_HASH_LEN],
            started_ms,
        }
    }

    pub(crate) fn ticket(&self) -> Option<&AuthTicket> {
        self.ticket.as_ref()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.ticket.is_some()
    }

    /// `true` if there is no ticket or it expires at or before `now_ms`.
    pub(crate) fn is_expired(&self, now_ms: u64) -> bool {
        match &self.ticket {
            None => true,
            Some(ticket) => ticket.expire_timestamp_ms <= now_ms,
        }
    }

    pub(crate) fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub(crate) fn session_hash(&self) -> &[u8; SESSION_HASH_LEN] {
        &self.session_hash
    }

    pub(crate) fn started_ms(&self) -> u64 {
        self.started_ms
    }

    /// Unauthenticated → Authenticated (or a full reset of an
    /// authenticated session). Replaces ticket, hash, epoch, and URL in
    /// one step.
    pub(crate) fn establish(
        &mut self,
        ticket: AuthTicket,
        session_hash: [u8; SESSION_HASH_LEN],
        started_ms: u64,
        url_token: &str,
    ) {
        self.ticket = Some(ticket);
        self.session_hash = session_hash;
        self.started_ms = started_ms;
        self.redirect(url_token);
    }

    /// Authenticated → Authenticated with a fresh ticket. Ignored while
    /// unauthenticated: only [`establish`](Self::establish) may leave
    /// that state. Returns whether the ticket was replaced.
    pub(crate) fn renew(&mut self, ticket: AuthTicket) -> bool {
        if self.ticket.is_none() || self.ticket.as_ref() == Some(&ticket) {
            return false;
        }
        self.ticket = Some(ticket);
        true
    }

    /// Points all future calls at `https://<url_token>/rpc`. Empty tokens
    /// are ignored. Returns whether the URL changed.
    pub(crate) fn redirect(&mut self, url_token: &str) -> bool {
        if url_token.is_empty() {
            return false;
        }
        let url = format!("https://{url_token}/rpc");
        if self.base_url.as_deref() == Some(url.as_str()) {
            return false;
        }
        self.base_url = Some(url);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(expire_timestamp_ms: u64) -> AuthTicket {
        AuthTicket {
            start: vec![1, 2, 3],
            expire_timestamp_ms,
            end: vec![9],
        }
    }

    fn established(expire_timestamp_ms: u64) -> TicketState {
        let mut state = TicketState::new(100);
        state.establish(ticket(expire_timestamp_ms), [7; 32], 200, "host.example");
        state
    }

    // =====================================================================
    // is_expired()
    // =====================================================================

    #[test]
    fn test_is_expired_without_ticket_is_true() {
        let state = TicketState::new(0);
        assert!(state.is_expired(0));
        assert!(state.is_expired(u64::MAX));
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_is_expired_at_exact_expiry_is_true() {
        let state = established(5_000);
        assert!(state.is_expired(5_000));
        assert!(state.is_expired(5_001));
    }

    #[test]
    fn test_is_expired_before_expiry_is_false() {
        let state = established(5_000);
        assert!(!state.is_expired(4_999));
    }

    // =====================================================================
    // establish()
    // =====================================================================

    #[test]
    fn test_establish_sets_every_field() {
        let state = established(5_000);

        assert!(state.is_authenticated());
        assert_eq!(state.session_hash(), &[7; 32]);
        assert_eq!(state.started_ms(), 200);
        assert_eq!(state.base_url(), Some("https://host.example/rpc"));
    }

    #[test]
    fn test_establish_again_replaces_previous_ticket() {
        let mut state = established(5_000);

        state.establish(ticket(9_000), [8; 32], 300, "other.example");

        assert_eq!(state.ticket().map(|t| t.expire_timestamp_ms), Some(9_000));
        assert_eq!(state.session_hash(), &[8; 32]);
        assert_eq!(state.base_url(), Some("https://other.example/rpc"));
    }

    // =====================================================================
    // renew()
    // =====================================================================

    #[test]
    fn test_renew_while_unauthenticated_is_ignored() {
        let mut state = TicketState::new(0);
        assert!(!state.renew(ticket(5_000)));
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_renew_replaces_ticket() {
        let mut state = established(5_000);
        assert!(state.renew(ticket(9_000)));
        assert_eq!(state.ticket().map(|t| t.expire_timestamp_ms), Some(9_000));
    }

    #[test]
    fn test_renew_with_same_ticket_reports_no_change() {
        let mut state = established(5_000);
        assert!(!state.renew(ticket(5_000)));
    }

    // =====================================================================
    // redirect()
    // =====================================================================

    #[test]
    fn test_redirect_empty_token_keeps_url() {
        let mut state = TicketState::new(0);
        assert!(!state.redirect(""));
        assert_eq!(state.base_url(), None);
    }

    #[test]
    fn test_redirect_formats_rpc_url() {
        let mut state = TicketState::new(0);
        assert!(state.redirect("pgorelease.example/plfe/112"));
        assert_eq!(
            state.base_url(),
            Some("https://pgorelease.example/plfe/112/rpc")
        );
        assert!(!state.redirect("pgorelease.example/plfe/112"));
    }

    #[test]
    fn test_now_ms_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }
}
