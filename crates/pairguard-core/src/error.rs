//! Error types for Pairguard Core.

use thiserror::Error;

/// Errors produced while issuing, validating, or (de)serializing token pairs.
///
/// Validation failures are deliberately coarse: every way a refresh token can
/// fail to open next to its access token is reported as `BindingMismatch`.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("access token signature is invalid")]
    SignatureInvalid,

    #[error("refresh token is not bound to this access token")]
    BindingMismatch,

    #[error("access token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("malformed pair envelope: {0}")]
    Envelope(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid origin address: {0}")]
    InvalidOrigin(String),

    #[error("secret must be {expected} bytes, got {actual}")]
    InvalidSecret { expected: usize, actual: usize },

    #[error("cipher initialization failed: {0}")]
    CipherInit(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("randomness source failed: {0}")]
    Randomness(String),
}

impl CodecError {
    /// Whether this error comes from the issuing side (keys, cipher, RNG)
    /// rather than from untrusted input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CodecError::CipherInit(_) | CodecError::Signing(_) | CodecError::Randomness(_)
        )
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
