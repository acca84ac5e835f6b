//! Envelope status classification.
//!
//! The backend reports the outcome of a whole envelope in one status
//! code. [`classify`] maps it to "success" or a [`StatusError`]. It is a
//! pure function of the code: which operation was called doesn't matter.

use pgoapi_protocol::StatusCode;

/// How bad a status-classified failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The caller can fix it (re-authenticate, follow the redirect) and
    /// retry.
    Recoverable,
    /// The request itself was rejected; retrying it unchanged won't help.
    Fatal,
}

/// A failure declared by the backend through the envelope status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The provider's access token was rejected. Log in again.
    #[error("backend rejected the auth token")]
    InvalidAuthToken,

    /// The ticket is no longer valid. Re-initialize the session.
    #[error("backend invalidated the session")]
    SessionInvalidated,

    /// The backend wants the call repeated against its new API URL.
    #[error("backend redirected the call")]
    Redirect,

    #[error("backend rejected the request as malformed")]
    BadRequest,

    #[error("backend rejected the request")]
    InvalidRequest,

    #[error("backend rejected the platform request")]
    InvalidPlatformRequest,

    /// A code this client doesn't know (including `UNKNOWN`).
    #[error("backend returned unknown status {0}")]
    Unknown(i32),
}

impl StatusError {
    pub fn class(&self) -> StatusClass {
        match self {
            Self::InvalidAuthToken | Self::SessionInvalidated | Self::Redirect => {
                StatusClass::Recoverable
            }
            Self::BadRequest
            | Self::InvalidRequest
            | Self::InvalidPlatformRequest
            | Self::Unknown(_) => StatusClass::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.class() == StatusClass::Recoverable
    }
}

/// Maps a raw envelope status code to success or a [`StatusError`].
pub fn classify(raw: i32) -> Result<(), StatusError> {
    let Ok(code) = StatusCode::try_from(raw) else {
        return Err(StatusError::Unknown(raw));
    };
    match code {
        StatusCode::Ok | StatusCode::OkRpcUrlInResponse => Ok(()),
        StatusCode::Redirect => Err(StatusError::Redirect),
        StatusCode::InvalidAuthToken => Err(StatusError::InvalidAuthToken),
        StatusCode::SessionInvalidated => Err(StatusError::SessionInvalidated),
        StatusCode::BadRequest => Err(StatusError::BadRequest),
        StatusCode::InvalidRequest => Err(StatusError::InvalidRequest),
        StatusCode::InvalidPlatformRequest => {
            Err(StatusError::InvalidPlatformRequest)
        }
        StatusCode::Unknown => Err(StatusError::Unknown(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ok_codes_are_success() {
        assert_eq!(classify(StatusCode::Ok as i32), Ok(()));
        assert_eq!(classify(StatusCode::OkRpcUrlInResponse as i32), Ok(()));
    }

    #[test]
    fn test_classify_auth_failures_are_recoverable() {
        let err = classify(StatusCode::InvalidAuthToken as i32).unwrap_err();
        assert_eq!(err, StatusError::InvalidAuthToken);
        assert_eq!(err.class(), StatusClass::Recoverable);

        let err = classify(StatusCode::SessionInvalidated as i32).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_classify_redirect_is_recoverable() {
        let err = classify(StatusCode::Redirect as i32).unwrap_err();
        assert_eq!(err, StatusError::Redirect);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_classify_rejections_are_fatal() {
        for code in [
            StatusCode::BadRequest,
            StatusCode::InvalidRequest,
            StatusCode::InvalidPlatformRequest,
            StatusCode::Unknown,
        ] {
            let err = classify(code as i32).unwrap_err();
            assert_eq!(err.class(), StatusClass::Fatal, "{code:?}");
        }
    }

    #[test]
    fn test_classify_unlisted_code_is_unknown_fatal() {
        let err = classify(777).unwrap_err();
        assert_eq!(err, StatusError::Unknown(777));
        assert_eq!(err.class(), StatusClass::Fatal);
    }
}
