//! Per-call cancellation and deadlines.
//!
//! Every session operation takes a [`CallContext`]. The context travels
//! from the caller through the session to the transport, and the session
//! races each awaited step (login, exchange) against it with
//! [`CallContext::guard`]. Dropping the losing future is what aborts the
//! in-flight exchange.
//!
//! ```text
//! caller ──(CallContext)──→ Session ──(same context)──→ Transport
//!    │                                    ▲
//!    └── CancelHandle::cancel() ──────────┘ (guard resolves Err(Cancelled))
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::Interrupted;

// ---------------------------------------------------------------------------
// CancelHandle / CancelSignal
// ---------------------------------------------------------------------------

/// The caller's side of a cancellation pair. Firing it cancels every
/// context built from its [`signal`](Self::signal).
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Cancels all contexts observing this handle. Idempotent.
    pub fn cancel(&self) {
        // `send_replace` succeeds even when no receiver is alive yet.
        self.tx.send_replace(true);
    }

    /// Returns a signal that observes this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The observing side of a [`CancelHandle`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Returns `true` once the handle has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the handle fires. Never resolves if the handle is
    /// dropped without firing.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

// ---------------------------------------------------------------------------
// CallContext
// ---------------------------------------------------------------------------

/// Cancellation and deadline for one call.
///
/// `CallContext::default()` never cancels and has no deadline.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancelSignal>,
}

impl CallContext {
    /// A context that is never cancelled and never times out.
    pub fn background() -> Self {
        Self::default()
    }

    /// Adds a cancellation signal.
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets a deadline `timeout` from now unless one is already set.
    pub fn or_timeout(self, timeout: Option<Duration>) -> Self {
        match (self.deadline, timeout) {
            (None, Some(timeout)) => self.with_timeout(timeout),
            _ => self,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the interruption that already applies, if any.
    ///
    /// Transports can poll this before starting expensive work.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
            return Err(Interrupted::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(Interrupted::DeadlineExceeded);
        }
        Ok(())
    }

    /// Runs `fut` unless the context is cancelled or its deadline passes
    /// first. On interruption `fut` is dropped, aborting whatever it was
    /// doing.
    pub async fn guard<F: Future>(
        &self,
        fut: F,
    ) -> Result<F::Output, Interrupted> {
        self.check()?;

        let cancelled = async {
            match &self.cancel {
                Some(signal) => signal.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        // `biased` so a context that fires while `fut` is also ready
        // reports the interruption deterministically.
        let out = tokio::select! {
            biased;
            () = cancelled => Err(Interrupted::Cancelled),
            () = expired => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        };
        if let Err(reason) = &out {
            tracing::debug!(%reason, "call interrupted");
        }
        out
    }
}
