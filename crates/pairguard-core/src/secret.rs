//! The shared symmetric secret.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CodecError, Result};

/// Length of the shared secret in bytes.
///
/// ChaCha20-Poly1305 takes exactly 256-bit keys; HS512 accepts any length.
pub const SECRET_LEN: usize = 32;

/// The single symmetric key used to sign access tokens and seal refresh tokens.
///
/// Wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, rejecting any length other than [`SECRET_LEN`].
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SECRET_LEN] = bytes.try_into().map_err(|_| CodecError::InvalidSecret {
            expected: SECRET_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse from a hex string (64 hex digits).
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s.trim()).map_err(|_| CodecError::InvalidSecret {
            expected: SECRET_LEN,
            actual: 0,
        })?;
        let secret = Self::try_from_slice(&bytes);
        bytes.zeroize();
        secret
    }

    /// Get the raw key material.
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        let err = Secret::try_from_slice(&[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidSecret {
                expected: 32,
                actual: 16
            }
        ));
    }

    #[test]
    fn test_from_hex() {
        let secret = Secret::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(secret.as_bytes(), &[0xab; 32]);

        assert!(Secret::from_hex("not hex").is_err());
        assert!(Secret::from_hex("abab").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::from_bytes([0x42; 32]);
        assert_eq!(format!("{:?}", secret), "Secret(..)");
    }
}
