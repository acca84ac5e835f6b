//! The operation catalog: which sub-requests each operation batches, and
//! where its results come back.
//!
//! Every builder here is pure. The session pairs a builder with the
//! matching return slots, so the request order and the slot indices live
//! next to each other and can't drift apart.
//!
//! | Operation        | Requests (in order)                                   | Slots              |
//! |------------------|-------------------------------------------------------|--------------------|
//! | bootstrap        | PLAYER, HATCHED_EGGS, INVENTORY, BADGES, SETTINGS     | none               |
//! | announce         | CHALLENGE, PLAYER, HATCHED_EGGS, INVENTORY, BADGES, SETTINGS, MAP_OBJECTS | challenge 0, map 6 |
//! | get_player       | PLAYER                                                | 0                  |
//! | get_inventory    | INVENTORY                                             | 0                  |
//! | encounter        | ENCOUNTER                                             | 0                  |
//! | check_challenge  | CHECK_CHALLENGE                                       | 0                  |
//! | solve_challenge  | VERIFY_CHALLENGE                                      | 0                  |

use pgoapi_protocol::{
    CheckChallengeResponse, Codec, DownloadSettingsMessage,
    EncounterMessage, EncounterResponse, GetInventoryMessage,
    GetInventoryResponse, GetMapObjectsMessage, GetMapObjectsResponse,
    GetPlayerResponse, Message, Request, RequestType, ReturnSlot,
    VerifyChallengeMessage, VerifyChallengeResponse,
};

use crate::{Location, SessionError};

/// Return slot constants, one per decoded payload.
pub mod slots {
    use super::*;

    pub const PLAYER: ReturnSlot<GetPlayerResponse> = ReturnSlot::at(0);
    pub const INVENTORY: ReturnSlot<GetInventoryResponse> = ReturnSlot::at(0);
    pub const ENCOUNTER: ReturnSlot<EncounterResponse> = ReturnSlot::at(0);
    pub const CHALLENGE: ReturnSlot<CheckChallengeResponse> = ReturnSlot::at(0);
    pub const VERIFY_CHALLENGE: ReturnSlot<VerifyChallengeResponse> =
        ReturnSlot::at(0);

    pub const ANNOUNCE_CHALLENGE: ReturnSlot<CheckChallengeResponse> =
        ReturnSlot::at(0);
    pub const ANNOUNCE_MAP_OBJECTS: ReturnSlot<GetMapObjectsResponse> =
        ReturnSlot::at(6);
}

fn with<C: Codec, M: Message>(
    codec: &C,
    kind: RequestType,
    message: &M,
) -> Result<Request, SessionError> {
    let bytes = codec.encode(message).map_err(SessionError::encode)?;
    Ok(Request::with_message(kind, bytes))
}

fn download_settings<C: Codec>(
    codec: &C,
    settings_hash: &str,
) -> Result<Request, SessionError> {
    with(
        codec,
        RequestType::DownloadSettings,
        &DownloadSettingsMessage {
            hash: settings_hash.to_owned(),
        },
    )
}

fn inventory<C: Codec>(
    codec: &C,
    last_timestamp_ms: i64,
) -> Result<Request, SessionError> {
    with(
        codec,
        RequestType::GetInventory,
        &GetInventoryMessage {
            last_timestamp_ms,
            ..Default::default()
        },
    )
}

/// The first call of a session: player, eggs, inventory, badges, settings.
pub(crate) fn bootstrap_requests<C: Codec>(
    codec: &C,
    settings_hash: &str,
) -> Result<Vec<Request>, SessionError> {
    Ok(vec![
        Request::bare(RequestType::GetPlayer),
        Request::bare(RequestType::GetHatchedEggs),
        Request::bare(RequestType::GetInventory),
        Request::bare(RequestType::CheckAwardedBadges),
        download_settings(codec, settings_hash)?,
    ])
}

/// The periodic heartbeat: everything the bootstrap asks for, preceded by
/// a challenge check and followed by the map objects around `location`.
///
/// `since_timestamp_ms` carries one zero per cell, so the backend returns
/// every cell in full.
pub(crate) fn announce_requests<C: Codec>(
    codec: &C,
    settings_hash: &str,
    location: &Location,
    now_ms: u64,
) -> Result<Vec<Request>, SessionError> {
    let cells = location.cell_ids();
    let map_objects = GetMapObjectsMessage {
        cell_id: cells.to_vec(),
        since_timestamp_ms: vec![0; cells.len()],
        latitude: location.lat(),
        longitude: location.lon(),
    };
    let last_timestamp_ms = i64::try_from(now_ms).unwrap_or(i64::MAX);

    Ok(vec![
        Request::bare(RequestType::CheckChallenge),
        Request::bare(RequestType::GetPlayer),
        Request::bare(RequestType::GetHatchedEggs),
        inventory(codec, last_timestamp_ms)?,
        Request::bare(RequestType::CheckAwardedBadges),
        download_settings(codec, settings_hash)?,
        with(codec, RequestType::GetMapObjects, &map_objects)?,
    ])
}

pub(crate) fn player_requests() -> Vec<Request> {
    vec![Request::bare(RequestType::GetPlayer)]
}

pub(crate) fn inventory_requests<C: Codec>(
    codec: &C,
    last_timestamp_ms: i64,
) -> Result<Vec<Request>, SessionError> {
    Ok(vec![inventory(codec, last_timestamp_ms)?])
}

pub(crate) fn encounter_requests<C: Codec>(
    codec: &C,
    encounter_id: u64,
    spawn_point_id: &str,
    location: &Location,
) -> Result<Vec<Request>, SessionError> {
    let message = EncounterMessage {
        encounter_id,
        spawn_point_id: spawn_point_id.to_owned(),
        player_latitude: location.lat(),
        player_longitude: location.lon(),
    };
    Ok(vec![with(codec, RequestType::Encounter, &message)?])
}

pub(crate) fn check_challenge_requests() -> Vec<Request> {
    vec![Request::bare(RequestType::CheckChallenge)]
}

pub(crate) fn verify_challenge_requests<C: Codec>(
    codec: &C,
    token: &str,
) -> Result<Vec<Request>, SessionError> {
    let message = VerifyChallengeMessage {
        token: token.to_owned(),
    };
    Ok(vec![with(codec, RequestType::VerifyChallenge, &message)?])
}
