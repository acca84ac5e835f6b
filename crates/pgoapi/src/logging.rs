//! Log subscriber setup for binaries built on pgoapi.
//!
//! The library crates only emit `tracing` events. Installing a subscriber
//! is the application's call; [`init`] is the stock one.
//!
//! Levels used across the workspace:
//! - `info`: session initialized, URL redirected, ticket renewed
//! - `warn`: dead proxy, challenge shown
//! - `debug`: one line per dispatched envelope
//! - `trace`: full JSON dumps of envelopes, signatures, and decoded returns

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back
/// to `default_directive` (e.g. `"pgoapi_session=info"`) when it is unset
/// or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(default_directive, "log subscriber installed");
    }
    installed
}
