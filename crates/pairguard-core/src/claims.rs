//! Claims carried inside the two halves of a token pair.
//!
//! [`AccessClaims`] travel signed (HS512) and in the clear; [`RefreshPayload`]
//! travels sealed with ChaCha20-Poly1305.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, Result};

/// Maximum number of unrecognised keys tolerated in access claims.
pub const MAX_CLAIM_EXTENSIONS: usize = 16;

/// A 96-bit unique token identifier, freshly random per issuance.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Jti(pub [u8; 12]);

impl Jti {
    /// Draw a new identifier from the OS randomness source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 12];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CodecError::Randomness(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl fmt::Debug for Jti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Jti({})", hex::encode(self.0))
    }
}

impl Serialize for Jti {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Jti {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)?;
        let arr: [u8; 12] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("jti must be 12 bytes"))?;
        Ok(Self(arr))
    }
}

/// Claims signed into the access token.
///
/// `subject` and `ip` are optional on the wire so that a token lacking them
/// still decodes and the handshake can reject it with the right status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    pub jti: Jti,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Keys this version does not interpret, kept for forward compatibility.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl AccessClaims {
    pub fn new(subject: impl Into<String>, ip: impl Into<String>, jti: Jti, iat: i64) -> Self {
        Self {
            subject: Some(subject.into()),
            ip: Some(ip.into()),
            jti,
            iat,
            extensions: BTreeMap::new(),
        }
    }

    /// Attach an extension claim.
    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Seconds elapsed since issuance.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.iat)
    }

    pub(crate) fn check_extensions(&self) -> Result<()> {
        if self.extensions.len() > MAX_CLAIM_EXTENSIONS {
            return Err(CodecError::Malformed(format!(
                "{} claim extensions exceed the limit of {}",
                self.extensions.len(),
                MAX_CLAIM_EXTENSIONS
            )));
        }
        Ok(())
    }
}

/// Payload sealed into the refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    pub ip: String,

    /// Issued-at, Unix seconds.
    pub iat: i64,
}

impl RefreshPayload {
    /// Whether the payload is still inside `lifetime_secs` at `now`.
    pub fn is_fresh(&self, now: i64, lifetime_secs: i64) -> bool {
        now.saturating_sub(self.iat) < lifetime_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jti_json_roundtrip() {
        let jti = Jti::from_bytes([7u8; 12]);
        let json = serde_json::to_string(&jti).unwrap();
        assert_eq!(json, "\"BwcHBwcHBwcHBwcH\"");
        let back: Jti = serde_json::from_str(&json).unwrap();
        assert_eq!(back, jti);
    }

    #[test]
    fn test_jti_wrong_length_rejected() {
        assert!(serde_json::from_str::<Jti>("\"BwcH\"").is_err());
    }

    #[test]
    fn test_jti_generate_unique() {
        let a = Jti::generate().unwrap();
        let b = Jti::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_claims_extensions_flatten() {
        let json = r#"{"subject":"u","ip":"10.0.0.1","jti":"BwcHBwcHBwcHBwcH","iat":5,"role":"admin"}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("u"));
        assert_eq!(claims.extensions.get("role"), Some(&serde_json::json!("admin")));
        assert!(claims.check_extensions().is_ok());
    }

    #[test]
    fn test_claims_missing_subject_decodes() {
        let json = r#"{"ip":"10.0.0.1","jti":"BwcHBwcHBwcHBwcH","iat":5}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();
        assert!(claims.subject.is_none());
    }

    #[test]
    fn test_too_many_extensions() {
        let mut claims = AccessClaims::new("u", "10.0.0.1", Jti::from_bytes([0; 12]), 0);
        for i in 0..=MAX_CLAIM_EXTENSIONS {
            claims = claims.with_extension(format!("x{}", i), serde_json::json!(i));
        }
        assert!(matches!(
            claims.check_extensions(),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_refresh_freshness() {
        let payload = RefreshPayload {
            ip: "10.0.0.1".into(),
            iat: 1_000,
        };
        assert!(payload.is_fresh(1_000, 60));
        assert!(payload.is_fresh(1_059, 60));
        assert!(!payload.is_fresh(1_060, 60));
    }
}
