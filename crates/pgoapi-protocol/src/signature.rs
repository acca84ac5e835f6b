//! The per-call signature bundle.
//!
//! A [`Signature`] is built fresh for every authenticated call, serialized,
//! encrypted, and attached as a single platform request. It never leaves
//! the process in plaintext and is never stored.

use prost::Message;
use serde::Serialize;

/// Static description of the emulated device.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct DeviceInfo {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(string, tag = "4")]
    pub device_brand: String,
    #[prost(string, tag = "5")]
    pub device_model: String,
    #[prost(string, tag = "7")]
    pub device_model_boot: String,
    #[prost(string, tag = "8")]
    pub hardware_manufacturer: String,
    #[prost(string, tag = "9")]
    pub hardware_model: String,
    #[prost(string, tag = "10")]
    pub firmware_brand: String,
    #[prost(string, tag = "13")]
    pub firmware_type: String,
}

/// Motion classification reported with the signature.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct ActivityStatus {
    #[prost(uint64, tag = "1")]
    pub start_time_ms: u64,
    #[prost(bool, tag = "3")]
    pub walking: bool,
    #[prost(bool, tag = "4")]
    pub running: bool,
    #[prost(bool, tag = "5")]
    pub stationary: bool,
    #[prost(bool, tag = "6")]
    pub automotive: bool,
    #[prost(bool, tag = "7")]
    pub tilting: bool,
    #[prost(bool, tag = "8")]
    pub cycling: bool,
}

/// Request-integrity proof for one envelope.
///
/// `request_hash[i]` covers `requests[i]` of the same envelope; the order
/// is significant and checked remotely.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Signature {
    #[prost(uint64, tag = "2")]
    pub timestamp_since_start: u64,
    #[prost(message, optional, tag = "8")]
    pub device_info: Option<DeviceInfo>,
    #[prost(message, optional, tag = "9")]
    pub activity_status: Option<ActivityStatus>,
    #[prost(uint64, tag = "10")]
    pub location_hash1: u64,
    #[prost(uint64, tag = "20")]
    pub location_hash2: u64,
    #[prost(bytes = "vec", tag = "22")]
    pub session_hash: Vec<u8>,
    #[prost(uint64, tag = "23")]
    pub timestamp: u64,
    #[prost(uint64, repeated, tag = "24")]
    pub request_hash: Vec<u64>,
    #[prost(int64, tag = "25")]
    pub unknown25: i64,
}
