//! Session configuration: every constant the protocol layer stamps into
//! envelopes and signatures.
//!
//! Nothing in the call path hard-codes these values. They are injected
//! through [`SessionConfig`] so tests can vary them and so one binary can
//! emulate different client profiles. `SessionConfig::default()` matches
//! the stock client.

use std::time::Duration;

use pgoapi_protocol::DeviceInfo;
use serde::{Deserialize, Serialize};

/// Endpoint used until the backend redirects the session.
pub const DEFAULT_URL: &str = "https://pgorelease.nianticlabs.com/plfe/rpc";

/// Settings hash pinned in every DOWNLOAD_SETTINGS sub-request.
pub const DOWNLOAD_SETTINGS_HASH: &str =
    "05daf51635c82611d1aac95c0b051d3ec088a930";

/// Text inside a challenge URL that means "the RPC URL rotated".
pub const ROTATION_MARKER: &str = "new RPC url";

// ---------------------------------------------------------------------------
// DeviceProfile
// ---------------------------------------------------------------------------

/// The device fingerprint reported in every signature.
///
/// Static configuration, never derived at runtime. The backend checks
/// these strings, so only change them to emulate another real device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub device_id: String,
    pub device_brand: String,
    pub device_model: String,
    pub device_model_boot: String,
    pub hardware_manufacturer: String,
    pub hardware_model: String,
    pub firmware_brand: String,
    pub firmware_type: String,
}

impl DeviceProfile {
    /// Converts the profile into its wire form.
    pub fn to_device_info(&self) -> DeviceInfo {
        DeviceInfo {
            device_id: self.device_id.clone(),
            device_brand: self.device_brand.clone(),
            device_model: self.device_model.clone(),
            device_model_boot: self.device_model_boot.clone(),
            hardware_manufacturer: self.hardware_manufacturer.clone(),
            hardware_model: self.hardware_model.clone(),
            firmware_brand: self.firmware_brand.clone(),
            firmware_type: self.firmware_type.clone(),
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            device_id: "<device_id>".into(),
            device_brand: "Apple".into(),
            device_model: "iPhone".into(),
            device_model_boot: "Iphone7,2".into(),
            hardware_manufacturer: "Apple".into(),
            hardware_model: "N66AP".into(),
            firmware_brand: "iPhone OS".into(),
            firmware_type: "9.3.3".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestIdPolicy
// ---------------------------------------------------------------------------

/// How the envelope's request id is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestIdPolicy {
    /// The same id on every call.
    Fixed(u64),
    /// A fresh random id per call.
    Random,
}

impl RequestIdPolicy {
    pub(crate) fn next(self) -> u64 {
        match self {
            Self::Fixed(id) => id,
            Self::Random => rand::random(),
        }
    }
}

impl Default for RequestIdPolicy {
    fn default() -> Self {
        Self::Fixed(8_145_806_132_888_207_460)
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration injected into a [`Session`](crate::Session) at
/// construction.
///
/// Load from JSON with [`SessionConfig::from_json`], or start from
/// `SessionConfig::default()` and override the fields you care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Endpoint used until a response carries an API URL.
    pub default_url: String,

    /// Hash sent with DOWNLOAD_SETTINGS sub-requests.
    pub settings_hash: String,

    /// Device fingerprint for signatures.
    pub device: DeviceProfile,

    /// Envelope request id policy.
    pub request_id: RequestIdPolicy,

    /// Envelope-level status code field (requests carry one too).
    pub envelope_status: i32,

    /// Reported age of the last location fix.
    pub ms_since_last_location_fix: i64,

    /// Second field of the raw auth-info token.
    pub token_unknown2: i32,

    /// Challenge URL text that signals a URL rotation.
    pub rotation_marker: String,

    /// Deadline applied to calls whose context has none. `None` means
    /// calls only end when the transport or the caller ends them.
    pub call_timeout: Option<Duration>,
}

impl SessionConfig {
    /// Parses a configuration from JSON. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_URL.into(),
            settings_hash: DOWNLOAD_SETTINGS_HASH.into(),
            device: DeviceProfile::default(),
            request_id: RequestIdPolicy::default(),
            envelope_status: 2,
            ms_since_last_location_fix: 989,
            token_unknown2: 59,
            rotation_marker: ROTATION_MARKER.into(),
            call_timeout: None,
        }
    }
}

/// A configuration document could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid session config: {0}")]
pub struct ConfigError(#[source] serde_json::Error);
