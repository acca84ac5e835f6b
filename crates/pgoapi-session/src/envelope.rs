//! Envelope construction and the signing handshake.
//!
//! Building an envelope is a pure function of its inputs: the requests,
//! the location snapshot, the credentials, the config, and the clock
//! reading. The session gathers those and calls [`EnvelopeBuilder::build`];
//! nothing here touches session state or the network.
//!
//! # Signing
//!
//! An authenticated envelope carries exactly one platform request of type
//! `SEND_ENCRYPTED_SIGNATURE`:
//!
//! 1. serialize the ticket and each sub-request
//! 2. hash each sub-request keyed by the ticket, in request order
//! 3. hash the location twice (ticket-keyed and plain)
//! 4. add the device profile, session hash, and timestamps
//! 5. serialize, encrypt with `since_start` as the auxiliary input, wrap
//!
//! An unauthenticated envelope carries raw auth info and no signature.

use pgoapi_protocol::{
    ActivityStatus, AuthInfo, AuthTicket, Codec, Jwt, PlatformRequest,
    PlatformRequestType, Request, RequestEnvelope,
    SendEncryptedSignatureRequest, Signature,
};

use crate::debug::trace_message;
use crate::{Location, SessionConfig, SessionError, Signer};

/// How an envelope authenticates.
pub(crate) enum Credentials<'a> {
    /// Before a ticket exists: provider id plus access token.
    Raw { provider: &'a str, token: String },
    /// With a ticket: the ticket plus what the signature needs.
    Ticket {
        ticket: &'a AuthTicket,
        session_hash: &'a [u8],
        started_ms: u64,
    },
}

pub(crate) struct EnvelopeBuilder<'a, S, C> {
    pub(crate) config: &'a SessionConfig,
    pub(crate) signer: &'a S,
    pub(crate) codec: &'a C,
    pub(crate) location: &'a Location,
}

impl<S: Signer, C: Codec> EnvelopeBuilder<'_, S, C> {
    /// Builds one envelope around `requests`.
    ///
    /// # Errors
    /// [`SessionError::Formatting`] if anything fails to serialize.
    pub(crate) fn build(
        &self,
        requests: Vec<Request>,
        credentials: Credentials<'_>,
        now_ms: u64,
    ) -> Result<RequestEnvelope, SessionError> {
        let mut envelope = RequestEnvelope {
            status_code: self.config.envelope_status,
            request_id: self.config.request_id.next(),
            requests,
            latitude: self.location.lat(),
            longitude: self.location.lon(),
            accuracy: self.location.accuracy(),
            ms_since_last_locationfix: self.config.ms_since_last_location_fix,
            ..Default::default()
        };

        match credentials {
            Credentials::Raw { provider, token } => {
                envelope.auth_info = Some(AuthInfo {
                    provider: provider.to_owned(),
                    token: Some(Jwt {
                        contents: token,
                        unknown2: self.config.token_unknown2,
                    }),
                });
            }
            Credentials::Ticket {
                ticket,
                session_hash,
                started_ms,
            } => {
                let signature = self.sign(
                    &envelope.requests,
                    ticket,
                    session_hash,
                    started_ms,
                    now_ms,
                )?;
                envelope.platform_requests = vec![self.seal(&signature)?];
                envelope.auth_ticket = Some(ticket.clone());
            }
        }

        Ok(envelope)
    }

    /// Computes the plaintext signature for `requests`.
    pub(crate) fn sign(
        &self,
        requests: &[Request],
        ticket: &AuthTicket,
        session_hash: &[u8],
        started_ms: u64,
        now_ms: u64,
    ) -> Result<Signature, SessionError> {
        let ticket_bytes =
            self.codec.encode(ticket).map_err(SessionError::encode)?;

        let request_hash = requests
            .iter()
            .map(|request| {
                let bytes =
                    self.codec.encode(request).map_err(SessionError::encode)?;
                Ok(self.signer.hash_request(&ticket_bytes, &bytes))
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        let (lat, lon, alt) =
            (self.location.lat(), self.location.lon(), self.location.alt());

        Ok(Signature {
            timestamp_since_start: now_ms.saturating_sub(started_ms),
            device_info: Some(self.config.device.to_device_info()),
            activity_status: Some(ActivityStatus {
                stationary: true,
                ..Default::default()
            }),
            location_hash1: self
                .signer
                .hash_location_with_ticket(&ticket_bytes, lat, lon, alt),
            location_hash2: self.signer.hash_location(lat, lon, alt),
            session_hash: session_hash.to_vec(),
            timestamp: now_ms,
            request_hash,
            // The salt is an opaque 64-bit pattern; the wire field is int64.
            unknown25: self.signer.fixed_salt() as i64,
        })
    }

    /// Encrypts a signature and wraps it as a platform request.
    fn seal(
        &self,
        signature: &Signature,
    ) -> Result<PlatformRequest, SessionError> {
        trace_message("request signature", signature);

        let plaintext =
            self.codec.encode(signature).map_err(SessionError::encode)?;
        // The encryption routine takes a 32-bit timestamp; truncation is
        // part of the protocol.
        let aux = signature.timestamp_since_start as u32;
        let encrypted_signature = self.signer.encrypt(&plaintext, aux);

        let request_message = self
            .codec
            .encode(&SendEncryptedSignatureRequest { encrypted_signature })
            .map_err(SessionError::encode)?;

        Ok(PlatformRequest {
            request_type: PlatformRequestType::SendEncryptedSignature as i32,
            request_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use pgoapi_protocol::{Message, ProtobufCodec, RequestType};

    use super::*;

    /// Hashes are the byte sum so tests can predict them; encryption
    /// prefixes the aux value so tests can read it back.
    struct SumSigner;

    impl Signer for SumSigner {
        fn hash_request(&self, ticket: &[u8], request: &[u8]) -> u64 {
            ticket.iter().chain(request).map(|b| u64::from(*b)).sum()
        }

        fn hash_location_with_ticket(
            &self,
            ticket: &[u8],
            lat: f64,
            _lon: f64,
            _alt: f64,
        ) -> u64 {
            ticket.len() as u64 + lat as u64
        }

        fn hash_location(&self, lat: f64, lon: f64, _alt: f64) -> u64 {
            (lat + lon) as u64
        }

        fn encrypt(&self, plaintext: &[u8], aux: u32) -> Vec<u8> {
            let mut out = aux.to_le_bytes().to_vec();
            out.extend_from_slice(plaintext);
            out
        }

        fn fixed_salt(&self) -> u64 {
            0x1234
        }
    }

    fn ticket() -> AuthTicket {
        AuthTicket {
            start: vec![1, 2],
            expire_timestamp_ms: 10_000,
            end: vec![3],
        }
    }

    fn three_requests() -> Vec<Request> {
        vec![
            Request::bare(RequestType::GetPlayer),
            Request::with_message(RequestType::GetInventory, vec![8, 5]),
            Request::bare(RequestType::CheckChallenge),
        ]
    }

    fn with_builder<R>(f: impl FnOnce(&EnvelopeBuilder<'_, SumSigner, ProtobufCodec>) -> R) -> R {
        let config = SessionConfig::default();
        let location = Location::new(40.0, 2.0, 10.0, 5.0);
        let builder = EnvelopeBuilder {
            config: &config,
            signer: &SumSigner,
            codec: &ProtobufCodec,
            location: &location,
        };
        f(&builder)
    }

    #[test]
    fn test_build_raw_attaches_auth_info_and_no_signature() {
        let env = with_builder(|b| {
            b.build(
                three_requests(),
                Credentials::Raw {
                    provider: "ptc",
                    token: "tok".into(),
                },
                1_000,
            )
        })
        .expect("build");

        let info = env.auth_info.expect("auth info");
        assert_eq!(info.provider, "ptc");
        let jwt = info.token.expect("jwt");
        assert_eq!(jwt.contents, "tok");
        assert_eq!(jwt.unknown2, 59);
        assert!(env.auth_ticket.is_none());
        assert!(env.platform_requests.is_empty());
    }

    #[test]
    fn test_build_ticket_attaches_exactly_one_signature() {
        let t = ticket();
        let env = with_builder(|b| {
            b.build(
                three_requests(),
                Credentials::Ticket {
                    ticket: &t,
                    session_hash: &[9; 32],
                    started_ms: 400,
                },
                1_000,
            )
        })
        .expect("build");

        assert!(env.auth_info.is_none());
        assert_eq!(env.auth_ticket.as_ref(), Some(&t));
        assert_eq!(env.platform_requests.len(), 1);
        assert_eq!(
            env.platform_requests[0].request_type,
            PlatformRequestType::SendEncryptedSignature as i32
        );
    }

    #[test]
    fn test_build_copies_location_and_config_constants() {
        let env = with_builder(|b| {
            b.build(
                Vec::new(),
                Credentials::Raw {
                    provider: "google",
                    token: String::new(),
                },
                0,
            )
        })
        .expect("build");

        assert_eq!(env.latitude, 40.0);
        assert_eq!(env.longitude, 2.0);
        assert_eq!(env.accuracy, 5.0);
        assert_eq!(env.status_code, 2);
        assert_eq!(env.request_id, 8_145_806_132_888_207_460);
        assert_eq!(env.ms_since_last_locationfix, 989);
    }

    #[test]
    fn test_sign_request_hashes_match_request_order() {
        let t = ticket();
        let requests = three_requests();

        let sig = with_builder(|b| b.sign(&requests, &t, &[0; 32], 0, 50))
            .expect("sign");

        let ticket_bytes = t.encode_to_vec();
        let expected: Vec<u64> = requests
            .iter()
            .map(|r| SumSigner.hash_request(&ticket_bytes, &r.encode_to_vec()))
            .collect();
        assert_eq!(sig.request_hash.len(), 3);
        assert_eq!(sig.request_hash, expected);
        // The inventory request carries a payload, so its hash differs.
        assert_ne!(sig.request_hash[0], sig.request_hash[1]);
    }

    #[test]
    fn test_sign_fills_timestamps_and_location_hashes() {
        let t = ticket();

        let sig = with_builder(|b| b.sign(&[], &t, &[4; 32], 400, 1_000))
            .expect("sign");

        assert_eq!(sig.timestamp, 1_000);
        assert_eq!(sig.timestamp_since_start, 600);
        assert_eq!(sig.session_hash, vec![4; 32]);
        assert_eq!(sig.location_hash2, 42);
        assert_eq!(
            sig.location_hash1,
            t.encode_to_vec().len() as u64 + 40
        );
        assert_eq!(sig.unknown25, 0x1234);
        assert!(sig.activity_status.expect("activity").stationary);
        assert_eq!(sig.device_info.expect("device").hardware_model, "N66AP");
    }

    #[test]
    fn test_sign_clock_before_start_saturates_to_zero() {
        let t = ticket();
        let sig = with_builder(|b| b.sign(&[], &t, &[0; 32], 5_000, 1_000))
            .expect("sign");
        assert_eq!(sig.timestamp_since_start, 0);
    }

    #[test]
    fn test_seal_encrypts_with_since_start_aux() {
        let t = ticket();
        let env = with_builder(|b| {
            b.build(
                three_requests(),
                Credentials::Ticket {
                    ticket: &t,
                    session_hash: &[9; 32],
                    started_ms: 400,
                },
                1_000,
            )
        })
        .expect("build");

        let wrapper = SendEncryptedSignatureRequest::decode(
            env.platform_requests[0].request_message.as_slice(),
        )
        .expect("wrapper decodes");
        let (aux, plaintext) = wrapper.encrypted_signature.split_at(4);
        assert_eq!(aux, 600u32.to_le_bytes());

        let sig = Signature::decode(plaintext).expect("signature decodes");
        assert_eq!(sig.request_hash.len(), 3);
        assert_eq!(sig.timestamp_since_start, 600);
    }
}
