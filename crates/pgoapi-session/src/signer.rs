//! The signing capability.
//!
//! Hashing and encryption primitives are implemented outside this crate.
//! The session only needs to call them in the right order with the right
//! inputs; [`Signer`] is that seam.

/// Deterministic hash and encryption primitives used to sign calls.
///
/// Implementations must be pure: the same inputs always give the same
/// outputs. `ticket` is always the serialized [`AuthTicket`] bytes.
///
/// [`AuthTicket`]: pgoapi_protocol::AuthTicket
pub trait Signer: Send + Sync + 'static {
    /// Hash of one serialized sub-request, keyed by the ticket.
    fn hash_request(&self, ticket: &[u8], request: &[u8]) -> u64;

    /// Location hash keyed by the ticket.
    fn hash_location_with_ticket(
        &self,
        ticket: &[u8],
        lat: f64,
        lon: f64,
        alt: f64,
    ) -> u64;

    /// Location hash without the ticket.
    fn hash_location(&self, lat: f64, lon: f64, alt: f64) -> u64;

    /// Encrypts a serialized signature. `aux` is the signature's
    /// milliseconds-since-session-start, truncated to 32 bits.
    fn encrypt(&self, plaintext: &[u8], aux: u32) -> Vec<u8>;

    /// Constant salt reported alongside every signature.
    fn fixed_salt(&self) -> u64;
}
