//! Parameter messages and typed sub-responses.
//!
//! Only the fields this client reads or writes are modeled. Deeply nested
//! game data (forts, wild encounters, inventory item payloads) is kept as
//! opaque length-delimited bytes: protobuf lets a message-typed field be
//! read as `bytes`, so nothing is lost and downstream consumers can decode
//! further if they care.

use prost::Message;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Request parameter messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct DownloadSettingsMessage {
    #[prost(string, tag = "1")]
    pub hash: String,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct GetInventoryMessage {
    #[prost(int64, tag = "1")]
    pub last_timestamp_ms: i64,
    #[prost(int32, tag = "2")]
    pub item_been_seen: i32,
}

/// Map query: the cells covering the player's area, one "since" timestamp
/// per cell, and the player's position.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct GetMapObjectsMessage {
    #[prost(uint64, repeated, tag = "1")]
    pub cell_id: Vec<u64>,
    #[prost(int64, repeated, tag = "2")]
    pub since_timestamp_ms: Vec<i64>,
    #[prost(double, tag = "3")]
    pub latitude: f64,
    #[prost(double, tag = "4")]
    pub longitude: f64,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct EncounterMessage {
    #[prost(fixed64, tag = "1")]
    pub encounter_id: u64,
    #[prost(string, tag = "2")]
    pub spawn_point_id: String,
    #[prost(double, tag = "3")]
    pub player_latitude: f64,
    #[prost(double, tag = "4")]
    pub player_longitude: f64,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct VerifyChallengeMessage {
    #[prost(string, tag = "1")]
    pub token: String,
}

/// Platform request wrapping the encrypted [`Signature`](crate::Signature).
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct SendEncryptedSignatureRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub encrypted_signature: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Sub-responses
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Currency {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "2")]
    pub amount: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PlayerData {
    #[prost(int64, tag = "1")]
    pub creation_timestamp_ms: i64,
    #[prost(string, tag = "2")]
    pub username: String,
    #[prost(int32, tag = "5")]
    pub team: i32,
    #[prost(int32, tag = "9")]
    pub max_pokemon_storage: i32,
    #[prost(int32, tag = "10")]
    pub max_item_storage: i32,
    #[prost(message, repeated, tag = "14")]
    pub currencies: Vec<Currency>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct GetPlayerResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(message, optional, tag = "2")]
    pub player_data: Option<PlayerData>,
    #[prost(bool, tag = "3")]
    pub banned: bool,
    #[prost(bool, tag = "4")]
    pub warn: bool,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct InventoryItem {
    #[prost(int64, tag = "1")]
    pub modified_timestamp_ms: i64,
    /// Opaque `DeletedItemKey`.
    #[prost(bytes = "vec", tag = "2")]
    pub deleted_item: Vec<u8>,
    /// Opaque `InventoryItemData`.
    #[prost(bytes = "vec", tag = "3")]
    pub inventory_item_data: Vec<u8>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct InventoryDelta {
    #[prost(int64, tag = "1")]
    pub original_timestamp_ms: i64,
    #[prost(int64, tag = "2")]
    pub new_timestamp_ms: i64,
    #[prost(message, repeated, tag = "3")]
    pub inventory_items: Vec<InventoryItem>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct GetInventoryResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(message, optional, tag = "2")]
    pub inventory_delta: Option<InventoryDelta>,
}

/// One map cell. Object lists are opaque per-object blobs.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct MapCell {
    #[prost(uint64, tag = "1")]
    pub s2_cell_id: u64,
    #[prost(int64, tag = "2")]
    pub current_timestamp_ms: i64,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub forts: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    pub spawn_points: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub wild_pokemons: Vec<Vec<u8>>,
    #[prost(string, repeated, tag = "6")]
    pub deleted_objects: Vec<String>,
    #[prost(bool, tag = "7")]
    pub is_truncated_list: bool,
    #[prost(bytes = "vec", repeated, tag = "10")]
    pub catchable_pokemons: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "11")]
    pub nearby_pokemons: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct GetMapObjectsResponse {
    #[prost(message, repeated, tag = "1")]
    pub map_cells: Vec<MapCell>,
    #[prost(int32, tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct EncounterResponse {
    /// Opaque `WildPokemonData`.
    #[prost(bytes = "vec", tag = "1")]
    pub wild_pokemon: Vec<u8>,
    #[prost(int32, tag = "2")]
    pub background: i32,
    #[prost(int32, tag = "3")]
    pub status: i32,
    /// Opaque `CaptureProbability`.
    #[prost(bytes = "vec", tag = "4")]
    pub capture_probability: Vec<u8>,
}

/// Whether the backend wants the player to solve a challenge, and where.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct CheckChallengeResponse {
    #[prost(bool, tag = "1")]
    pub show_challenge: bool,
    #[prost(string, tag = "2")]
    pub challenge_url: String,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct VerifyChallengeResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}
