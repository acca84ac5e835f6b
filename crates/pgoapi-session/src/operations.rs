//! High-level operations built on [`Session::call`].
//!
//! Each operation batches its sub-requests in a fixed order,
//! makes one call, decodes its return slots, pushes every decoded payload
//! to the result sink, and classifies the envelope status.
//!
//! A non-OK status does not discard the payload: operations return a
//! [`Reply`] carrying both, because the backend often sends usable data
//! alongside a recoverable status. Use [`Reply::into_result`] to treat
//! any status failure as an error.

use pgoapi_protocol::{
    Codec, EncounterResponse, GetInventoryResponse, GetMapObjectsResponse,
    GetPlayerResponse, Request, ResponseEnvelope, ReturnSlot,
    VerifyChallengeResponse,
};
use pgoapi_transport::{CallContext, ProxySelector, Transport};

use crate::catalog::{self, slots};
use crate::sink::Deliverable;
use crate::state::now_ms;
use crate::{
    Challenge, CredentialProvider, Location, Session, SessionError, Signer,
    StatusError, classify,
};

// ---------------------------------------------------------------------------
// Result shapes
// ---------------------------------------------------------------------------

/// A decoded payload plus the status the backend attached to it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Reply<T> {
    pub payload: T,
    /// `None` when the envelope status was OK.
    pub status: Option<StatusError>,
}

impl<T> Reply<T> {
    fn classified(payload: T, response: &ResponseEnvelope) -> Self {
        Self {
            payload,
            status: classify(response.status_code).err(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_none()
    }

    /// The payload, or the status failure as a [`SessionError::Status`].
    pub fn into_result(self) -> Result<T, SessionError> {
        match self.status {
            Some(status) => Err(status.into()),
            None => Ok(self.payload),
        }
    }
}

/// What an announce returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub map_objects: GetMapObjectsResponse,
    /// `Some` when the backend wants a challenge solved.
    pub challenge: Option<Challenge>,
    /// `true` when the shown challenge carried the rotation marker and the
    /// response named the API URL the session now uses.
    pub url_rotated: bool,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl<P, S, T, C> Session<P, S, T, C>
where
    P: CredentialProvider,
    S: Signer,
    T: Transport,
    C: Codec,
{
    /// Reports the current location and fetches the map objects around it.
    ///
    /// A shown challenge is returned in [`Announcement::challenge`], never
    /// as an error, and suppresses the status. If its URL carries the
    /// rotation marker, [`Announcement::url_rotated`] reports whether the
    /// response named a new API URL. The switch itself happens in
    /// [`call`](Self::call), which absorbs every returned URL. Without a
    /// shown challenge the status is classified as usual.
    pub async fn announce(
        &mut self,
        ctx: &CallContext,
        proxy: ProxySelector,
    ) -> Result<Reply<Announcement>, SessionError> {
        let requests = catalog::announce_requests(
            &self.codec,
            &self.config.settings_hash,
            &self.location,
            now_ms(),
        )?;
        let response = self.call(ctx, requests, proxy).await?;

        let map_objects = self.deliver(slots::ANNOUNCE_MAP_OBJECTS, &response)?;
        let check = self.deliver(slots::ANNOUNCE_CHALLENGE, &response)?;
        let challenge = Challenge::shown(&check);

        let mut url_rotated = false;
        let status = match &challenge {
            Some(challenge) => {
                tracing::warn!(url = %challenge.url, "backend requested a challenge");
                if challenge.signals_rotation(&self.config.rotation_marker) {
                    url_rotated = !response.api_url.is_empty();
                    if url_rotated {
                        tracing::info!(
                            url = self.base_url(),
                            "challenge signalled an rpc url rotation"
                        );
                    } else {
                        tracing::warn!("rpc url rotation signalled without an api url");
                    }
                }
                None
            }
            None => classify(response.status_code).err(),
        };

        tracing::debug!(
            cells = map_objects.map_cells.len(),
            challenged = challenge.is_some(),
            url_rotated,
            "announced"
        );
        Ok(Reply {
            payload: Announcement {
                map_objects,
                challenge,
                url_rotated,
            },
            status,
        })
    }

    /// Same as [`announce`](Self::announce).
    pub async fn get_player_map(
        &mut self,
        ctx: &CallContext,
        proxy: ProxySelector,
    ) -> Result<Reply<Announcement>, SessionError> {
        self.announce(ctx, proxy).await
    }

    pub async fn get_player(
        &mut self,
        ctx: &CallContext,
        proxy: ProxySelector,
    ) -> Result<Reply<GetPlayerResponse>, SessionError> {
        let requests = catalog::player_requests();
        self.single(ctx, requests, proxy, slots::PLAYER).await
    }

    /// Fetches inventory changes since `last_timestamp_ms` (0 for all).
    pub async fn get_inventory(
        &mut self,
        ctx: &CallContext,
        last_timestamp_ms: i64,
        proxy: ProxySelector,
    ) -> Result<Reply<GetInventoryResponse>, SessionError> {
        let requests = catalog::inventory_requests(&self.codec, last_timestamp_ms)?;
        self.single(ctx, requests, proxy, slots::INVENTORY).await
    }

    /// Starts an encounter with a wild spawn seen from `at`.
    ///
    /// `at` is only used for the encounter message; the envelope still
    /// reports the session's own location.
    pub async fn encounter(
        &mut self,
        ctx: &CallContext,
        encounter_id: u64,
        spawn_point_id: &str,
        at: &Location,
        proxy: ProxySelector,
    ) -> Result<Reply<EncounterResponse>, SessionError> {
        let requests = catalog::encounter_requests(
            &self.codec,
            encounter_id,
            spawn_point_id,
            at,
        )?;
        self.single(ctx, requests, proxy, slots::ENCOUNTER).await
    }

    /// Asks whether the backend wants a challenge solved.
    ///
    /// Returns `None` when no challenge is shown.
    pub async fn check_challenge(
        &mut self,
        ctx: &CallContext,
        proxy: ProxySelector,
    ) -> Result<Reply<Option<Challenge>>, SessionError> {
        let requests = catalog::check_challenge_requests();
        let reply = self.single(ctx, requests, proxy, slots::CHALLENGE).await?;
        Ok(Reply {
            payload: Challenge::shown(&reply.payload),
            status: reply.status,
        })
    }

    /// Submits the token obtained by solving a challenge.
    pub async fn solve_challenge(
        &mut self,
        ctx: &CallContext,
        token: &str,
        proxy: ProxySelector,
    ) -> Result<Reply<VerifyChallengeResponse>, SessionError> {
        let requests = catalog::verify_challenge_requests(&self.codec, token)?;
        let reply = self
            .single(ctx, requests, proxy, slots::VERIFY_CHALLENGE)
            .await?;
        tracing::info!(success = reply.payload.success, "challenge submitted");
        Ok(reply)
    }

    /// One call whose interesting result lives in one slot.
    async fn single<M: Deliverable>(
        &mut self,
        ctx: &CallContext,
        requests: Vec<Request>,
        proxy: ProxySelector,
        slot: ReturnSlot<M>,
    ) -> Result<Reply<M>, SessionError> {
        let response = self.call(ctx, requests, proxy).await?;
        let payload = self.deliver(slot, &response)?;
        Ok(Reply::classified(payload, &response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_into_result_ok_status_yields_payload() {
        let reply = Reply {
            payload: 5,
            status: None,
        };
        assert!(reply.is_ok());
        assert_eq!(reply.into_result().expect("ok"), 5);
    }

    #[test]
    fn test_reply_into_result_status_failure_is_error() {
        let reply = Reply {
            payload: 5,
            status: Some(StatusError::Redirect),
        };
        assert!(!reply.is_ok());
        assert!(matches!(
            reply.into_result(),
            Err(SessionError::Status(StatusError::Redirect))
        ));
    }

    #[test]
    fn test_reply_classified_reads_envelope_status() {
        let response = ResponseEnvelope {
            status_code: 102,
            ..Default::default()
        };
        let reply = Reply::classified((), &response);
        assert_eq!(reply.status, Some(StatusError::InvalidAuthToken));

        let response = ResponseEnvelope {
            status_code: 1,
            ..Default::default()
        };
        assert!(Reply::classified((), &response).is_ok());
    }
}
