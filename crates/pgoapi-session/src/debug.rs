//! Trace-level message dumps.

use serde::Serialize;

/// Logs `message` as JSON at TRACE level. Rendering is skipped entirely
/// unless TRACE is enabled for this crate.
pub(crate) fn trace_message<T: Serialize>(label: &str, message: &T) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    match pgoapi_protocol::to_debug_json(message) {
        Ok(json) => tracing::trace!(label, message = %json),
        Err(e) => tracing::trace!(label, error = %e, "message dump failed"),
    }
}
