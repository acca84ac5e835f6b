//! Downstream delivery of decoded results.
//!
//! Every payload a session operation decodes is pushed to the session's
//! [`ResultSink`] before it is returned to the caller. Observers (a map
//! tracker, a recorder, a metrics exporter) subscribe there instead of
//! wrapping every call site.

use pgoapi_protocol::{
    CheckChallengeResponse, EncounterResponse, GetInventoryResponse,
    GetMapObjectsResponse, GetPlayerResponse, Message,
    VerifyChallengeResponse,
};
use serde::Serialize;
use tokio::sync::mpsc;

/// A decoded sub-response, tagged by the operation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Player(GetPlayerResponse),
    Inventory(GetInventoryResponse),
    MapObjects(GetMapObjectsResponse),
    Encounter(EncounterResponse),
    Challenge(CheckChallengeResponse),
    ChallengeVerification(VerifyChallengeResponse),
}

/// A sub-response type that can be pushed to a sink.
pub(crate) trait Deliverable: Message + Default + Clone + Serialize {
    fn into_decoded(self) -> Decoded;
}

macro_rules! deliverable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Deliverable for $ty {
                fn into_decoded(self) -> Decoded {
                    Decoded::$variant(self)
                }
            }
        )*
    };
}

deliverable! {
    GetPlayerResponse => Player,
    GetInventoryResponse => Inventory,
    GetMapObjectsResponse => MapObjects,
    EncounterResponse => Encounter,
    CheckChallengeResponse => Challenge,
    VerifyChallengeResponse => ChallengeVerification,
}

/// Receives every successfully decoded payload.
///
/// `push` is fire-and-forget: it must not block and has no way to fail
/// the operation that produced the payload.
pub trait ResultSink: Send + Sync + 'static {
    fn push(&self, payload: Decoded);
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn push(&self, _payload: Decoded) {}
}

/// Forwards payloads into an unbounded Tokio channel.
///
/// Sending on an unbounded channel never blocks. If the receiver is gone
/// the payload is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Decoded>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Decoded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn push(&self, payload: Decoded) {
        if self.tx.send(payload).is_err() {
            tracing::trace!("result sink receiver closed, payload dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();

        sink.push(Decoded::Player(GetPlayerResponse::default()));
        sink.push(Decoded::Challenge(CheckChallengeResponse {
            show_challenge: true,
            challenge_url: "u".into(),
        }));

        assert!(matches!(rx.try_recv(), Ok(Decoded::Player(_))));
        assert!(matches!(
            rx.try_recv(),
            Ok(Decoded::Challenge(c)) if c.show_challenge
        ));
    }

    #[test]
    fn test_channel_sink_closed_receiver_does_not_panic() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.push(Decoded::Player(GetPlayerResponse::default()));
    }
}
