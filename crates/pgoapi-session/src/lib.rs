//! Session layer for the pgoapi RPC client.
//!
//! This crate is where a player's conversation with the backend lives:
//!
//! 1. **Authentication**: a [`CredentialProvider`] logs in, then
//!    [`Session::initialize`] trades the token for a ticket
//! 2. **Signing**: every authenticated call carries an encrypted
//!    signature computed through the [`Signer`] seam
//! 3. **Interpretation**: envelope status codes become [`StatusError`]s,
//!    challenges become [`Challenge`] results, decoded payloads flow to a
//!    [`ResultSink`]
//! 4. **Operations**: [`Session::announce`], [`Session::get_player`],
//!    [`Session::encounter`], and friends batch the right sub-requests
//!
//! # How it fits in the stack
//!
//! ```text
//! Your bot / scanner (above)  ← drives sessions, rotates proxies
//!     ↕
//! Session Layer (this crate)  ← tickets, signing, status, operations
//!     ↕
//! Transport Layer (below)     ← carries one envelope to one URL via one proxy
//!     ↕
//! Protocol Layer (bottom)     ← wire messages and the codec
//! ```

mod auth;
mod catalog;
mod challenge;
mod config;
mod debug;
mod envelope;
mod error;
mod location;
mod operations;
mod session;
mod signer;
mod sink;
mod state;
mod status;

pub use auth::CredentialProvider;
pub use catalog::slots;
pub use challenge::Challenge;
pub use config::{
    ConfigError, DEFAULT_URL, DOWNLOAD_SETTINGS_HASH, DeviceProfile,
    ROTATION_MARKER, RequestIdPolicy, SessionConfig,
};
pub use error::{FormatError, SessionError};
pub use location::Location;
pub use operations::{Announcement, Reply};
pub use session::{Session, SessionBuilder};
pub use signer::Signer;
pub use sink::{ChannelSink, Decoded, NullSink, ResultSink};
pub use state::SESSION_HASH_LEN;
pub use status::{StatusClass, StatusError, classify};
