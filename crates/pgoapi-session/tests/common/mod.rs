//! Shared fakes for the session integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pgoapi_protocol::{
    AuthTicket, Codec, Message, PlatformRequestType, ProtobufCodec,
    ProtocolError, RequestEnvelope, ResponseEnvelope,
    SendEncryptedSignatureRequest, Signature,
};
use pgoapi_session::{
    CredentialProvider, Decoded, Location, ResultSink, Session,
    SessionConfig, SessionError, Signer,
};
use pgoapi_transport::{
    CallContext, ProxySelector, Transport, TransportError,
};

// =========================================================================
// ScriptedTransport: replays canned responses and records what was sent.
// =========================================================================

pub enum Step {
    Respond(ResponseEnvelope),
    Fail(TransportError),
    /// Never completes; only the call context can end the call.
    Hang,
}

/// One recorded exchange.
#[derive(Clone)]
pub struct Sent {
    pub url: String,
    pub envelope: RequestEnvelope,
    pub proxy: ProxySelector,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Step>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(&self, step: Step) -> &Self {
        self.script.lock().unwrap().push_back(step);
        self
    }

    pub fn respond(&self, response: ResponseEnvelope) -> &Self {
        self.then(Step::Respond(response))
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Sent {
        self.sent().pop().expect("at least one exchange")
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    async fn exchange(
        &self,
        _ctx: &CallContext,
        base_url: &str,
        envelope: &RequestEnvelope,
        proxy: ProxySelector,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.sent.lock().unwrap().push(Sent {
            url: base_url.to_owned(),
            envelope: envelope.clone(),
            proxy,
        });
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) | None => std::future::pending().await,
        }
    }
}

// =========================================================================
// StaticProvider: a credential provider with a fixed token.
// =========================================================================

#[derive(Clone)]
pub struct StaticProvider {
    provider: String,
    token: String,
    fail_with: Option<String>,
    logins: Arc<AtomicUsize>,
}

impl StaticProvider {
    pub fn new(provider: &str, token: &str) -> Self {
        Self {
            provider: provider.into(),
            token: token.into(),
            fail_with: None,
            logins: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::new("ptc", "")
        }
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl CredentialProvider for StaticProvider {
    async fn login(&self, _ctx: &CallContext) -> Result<String, SessionError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(SessionError::AuthFailed(reason.clone())),
            None => Ok(self.token.clone()),
        }
    }

    fn provider_id(&self) -> &str {
        &self.provider
    }

    fn access_token(&self) -> String {
        self.token.clone()
    }
}

// =========================================================================
// XorSigner: predictable hashes, reversible "encryption".
// =========================================================================

#[derive(Clone, Copy, Default)]
pub struct XorSigner;

impl XorSigner {
    /// FNV-1a, so hashes differ per input but are easy to recompute.
    pub fn fnv(parts: &[&[u8]]) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for part in parts {
            for byte in *part {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
        }
        hash
    }

    /// Inverts [`Signer::encrypt`]: returns `(aux, plaintext)`.
    pub fn decrypt(ciphertext: &[u8]) -> (u32, Vec<u8>) {
        let (aux, body) = ciphertext.split_at(4);
        let aux = u32::from_le_bytes(aux.try_into().unwrap());
        let key = aux.to_le_bytes()[0];
        (aux, body.iter().map(|b| b ^ key).collect())
    }
}

impl Signer for XorSigner {
    fn hash_request(&self, ticket: &[u8], request: &[u8]) -> u64 {
        Self::fnv(&[ticket, request])
    }

    fn hash_location_with_ticket(
        &self,
        ticket: &[u8],
        lat: f64,
        lon: f64,
        alt: f64,
    ) -> u64 {
        Self::fnv(&[
            ticket,
            &lat.to_le_bytes()[..],
            &lon.to_le_bytes()[..],
            &alt.to_le_bytes()[..],
        ])
    }

    fn hash_location(&self, lat: f64, lon: f64, alt: f64) -> u64 {
        Self::fnv(&[
            &lat.to_le_bytes()[..],
            &lon.to_le_bytes()[..],
            &alt.to_le_bytes()[..],
        ])
    }

    fn encrypt(&self, plaintext: &[u8], aux: u32) -> Vec<u8> {
        let key = aux.to_le_bytes()[0];
        let mut out = aux.to_le_bytes().to_vec();
        out.extend(plaintext.iter().map(|b| b ^ key));
        out
    }

    fn fixed_salt(&self) -> u64 {
        0x1c8a_3d6e_0000_0001
    }
}

// =========================================================================
// RecordingSink: keeps every delivered payload.
// =========================================================================

#[derive(Clone, Default)]
pub struct RecordingSink {
    seen: Arc<Mutex<Vec<Decoded>>>,
}

impl RecordingSink {
    pub fn seen(&self) -> Vec<Decoded> {
        self.seen.lock().unwrap().clone()
    }
}

impl ResultSink for RecordingSink {
    fn push(&self, payload: Decoded) {
        self.seen.lock().unwrap().push(payload);
    }
}

// =========================================================================
// FailingCodec: every non-empty message fails to encode.
// =========================================================================

#[derive(Clone, Copy, Default)]
pub struct FailingCodec;

impl Codec for FailingCodec {
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError> {
        // A zero-capacity buffer makes prost report a real EncodeError.
        let mut buf: &mut [u8] = &mut [];
        message.encode(&mut buf)?;
        Ok(Vec::new())
    }

    fn decode<M: Message + Default>(
        &self,
        data: &[u8],
    ) -> Result<M, ProtocolError> {
        ProtobufCodec.decode(data)
    }
}

// =========================================================================
// Builders and helpers
// =========================================================================

pub type TestSession = Session<StaticProvider, XorSigner, ScriptedTransport>;

pub struct Harness {
    pub session: TestSession,
    pub transport: ScriptedTransport,
    pub provider: StaticProvider,
    pub sink: RecordingSink,
}

pub fn location() -> Location {
    Location::new(40.7128, -74.006, 10.0, 3.0).with_cells(vec![11, 22, 33])
}

pub fn harness() -> Harness {
    harness_with(SessionConfig::default())
}

pub fn harness_with(config: SessionConfig) -> Harness {
    let transport = ScriptedTransport::new();
    let provider = StaticProvider::new("ptc", "access-token");
    let sink = RecordingSink::default();
    let session = Session::builder(
        provider.clone(),
        XorSigner,
        transport.clone(),
        location(),
    )
    .config(config)
    .sink(Arc::new(sink.clone()))
    .build();
    Harness {
        session,
        transport,
        provider,
        sink,
    }
}

pub fn ticket(expire_timestamp_ms: u64) -> AuthTicket {
    AuthTicket {
        start: b"ticket-start".to_vec(),
        expire_timestamp_ms,
        end: b"ticket-end".to_vec(),
    }
}

/// A ticket that stays valid for an hour.
pub fn fresh_ticket() -> AuthTicket {
    ticket(now_ms() + 3_600_000)
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

pub fn encode<M: Message>(message: &M) -> Vec<u8> {
    message.encode_to_vec()
}

/// A response envelope with the given status, URL token, ticket and returns.
pub fn response(
    status_code: i32,
    api_url: &str,
    auth_ticket: Option<AuthTicket>,
    returns: Vec<Vec<u8>>,
) -> ResponseEnvelope {
    ResponseEnvelope {
        status_code,
        api_url: api_url.into(),
        auth_ticket,
        returns,
        ..Default::default()
    }
}

/// The successful bootstrap answer.
pub fn bootstrap_ok() -> ResponseEnvelope {
    response(2, "pgorelease.example/plfe/101", Some(fresh_ticket()), vec![])
}

/// Runs `initialize` against a scripted bootstrap answer.
pub async fn initialized() -> Harness {
    let mut h = harness();
    h.transport.respond(bootstrap_ok());
    h.session
        .initialize(&CallContext::background(), ProxySelector::DIRECT)
        .await
        .expect("initialize");
    h
}

/// Decrypts and decodes the signature carried by `envelope`.
pub fn signature_of(envelope: &RequestEnvelope) -> Signature {
    let platform = envelope
        .platform_requests_of(PlatformRequestType::SendEncryptedSignature)
        .next()
        .expect("signature platform request");
    let wrapper =
        SendEncryptedSignatureRequest::decode(platform.request_message.as_slice())
            .expect("wrapper decodes");
    let (_, plaintext) = XorSigner::decrypt(&wrapper.encrypted_signature);
    Signature::decode(plaintext.as_slice()).expect("signature decodes")
}
