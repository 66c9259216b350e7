//! Error types for the handshake.
//!
//! Internal sub-causes are kept for logs. What a caller sees is only the
//! status: every 401 renders identically, whatever check failed.

use pairguard_core::CodecError;
use pairguard_store::StoreError;
use thiserror::Error;

use crate::reply::Status;

/// Why a well-formed request was rejected as invalid (400).
#[derive(Debug, Error)]
pub enum Rejection {
    /// The pair failed signature or binding validation.
    #[error("token validation failed: {0}")]
    Codec(#[from] CodecError),

    /// The refresh token is past its lifetime.
    #[error("refresh token expired")]
    Expired,

    /// The two halves of the pair disagree on the issuing address.
    #[error("token payload mismatch")]
    PayloadMismatch,

    /// The identity text is not a valid identifier.
    #[error("invalid identity")]
    InvalidIdentity,

    /// The request origin could not be parsed as an address.
    #[error("invalid origin address")]
    InvalidOrigin,
}

/// Why an authorization check failed (401).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    UnknownIdentity,
    MissingSubject,
    NoLiveCredential,
    InvalidCredential,
    /// The pair was presented from an address other than the one it was
    /// issued to.
    Compromised,
    InvalidAccessToken,
}

impl Denial {
    /// Stable label for structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::UnknownIdentity => "unknown_identity",
            Denial::MissingSubject => "missing_subject",
            Denial::NoLiveCredential => "no_live_credential",
            Denial::InvalidCredential => "invalid_credential",
            Denial::Compromised => "compromised",
            Denial::InvalidAccessToken => "invalid_access_token",
        }
    }
}

/// Errors that can occur during handshake operations.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The request body is not a token pair envelope.
    #[error("unsupported payload: {0}")]
    UnsupportedPayload(String),

    #[error("bad request: {0}")]
    BadRequest(Rejection),

    /// Deliberately uniform; the cause is only available via [`Denial`].
    #[error("unauthorized")]
    Unauthorized(Denial),

    /// Infrastructure failure (store, cipher, randomness, hashing).
    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl HandshakeError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            HandshakeError::UnsupportedPayload(_) => Status::UnsupportedMediaType,
            HandshakeError::BadRequest(_) => Status::BadRequest,
            HandshakeError::Unauthorized(_) => Status::Unauthorized,
            HandshakeError::Internal(_) | HandshakeError::Config(_) => {
                Status::InternalServerError
            }
        }
    }

    /// The internal denial reason, if this is a 401.
    pub fn denial(&self) -> Option<Denial> {
        match self {
            HandshakeError::Unauthorized(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<StoreError> for HandshakeError {
    fn from(e: StoreError) -> Self {
        HandshakeError::Internal(e.to_string())
    }
}

impl From<CodecError> for HandshakeError {
    fn from(e: CodecError) -> Self {
        if e.is_fatal() {
            HandshakeError::Internal(e.to_string())
        } else {
            HandshakeError::BadRequest(Rejection::Codec(e))
        }
    }
}

/// Result type for handshake operations.
pub type Result<T> = std::result::Result<T, HandshakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_uniform() {
        let a = HandshakeError::Unauthorized(Denial::UnknownIdentity);
        let b = HandshakeError::Unauthorized(Denial::Compromised);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status(), Status::Unauthorized);
        assert_eq!(b.denial(), Some(Denial::Compromised));
    }

    #[test]
    fn test_codec_error_mapping() {
        let bad: HandshakeError = CodecError::BindingMismatch.into();
        assert_eq!(bad.status(), Status::BadRequest);

        let fatal: HandshakeError = CodecError::CipherInit("bad key".into()).into();
        assert_eq!(fatal.status(), Status::InternalServerError);
    }

    #[test]
    fn test_store_error_is_internal() {
        let err: HandshakeError = StoreError::Poisoned("boom".into()).into();
        assert_eq!(err.status(), Status::InternalServerError);
    }
}
