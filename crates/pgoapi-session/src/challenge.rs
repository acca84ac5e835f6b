//! The challenge (CAPTCHA) sub-protocol.
//!
//! The backend can ask for a challenge on any response that includes a
//! CHECK_CHALLENGE return. A shown challenge is a result, not an error:
//! the operation still returns its payload and the caller decides whether
//! to solve the challenge (via
//! [`Session::solve_challenge`](crate::Session::solve_challenge)) or stop.

use pgoapi_protocol::CheckChallengeResponse;

/// A challenge the backend wants solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Where the challenge is served. Also used by the backend to announce
    /// RPC URL rotations (see [`signals_rotation`](Self::signals_rotation)).
    pub url: String,
}

impl Challenge {
    /// Returns the challenge only if the backend asked to show it.
    pub fn shown(response: &CheckChallengeResponse) -> Option<Self> {
        response.show_challenge.then(|| Self {
            url: response.challenge_url.clone(),
        })
    }

    /// `true` if this challenge's URL text carries `marker`, meaning the
    /// session must switch to the API URL of the same response.
    pub fn signals_rotation(&self, marker: &str) -> bool {
        !marker.is_empty() && self.url.contains(marker)
    }
}
