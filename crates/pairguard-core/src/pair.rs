//! Token pairs and their transport envelope.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// An access token and the refresh token bound to it.
///
/// Built once per issuance and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access: String,
    refresh: String,
}

impl TokenPair {
    pub fn new(access: String, refresh: String) -> Self {
        Self { access, refresh }
    }

    pub fn access(&self) -> &str {
        &self.access
    }

    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    /// Serialize as a pretty-printed [`PairEnvelope`].
    pub fn to_json(&self) -> Result<Vec<u8>> {
        PairEnvelope::from(self.clone()).to_vec_pretty()
    }

    /// Parse an envelope and require both halves.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        PairEnvelope::from_slice(bytes)?.try_into()
    }
}

/// Wire form of a pair. Either field may be absent so that a partial pair can
/// still be carried in error contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl PairEnvelope {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Envelope(e.to_string()))
    }

    pub fn to_vec_pretty(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| CodecError::Envelope(e.to_string()))
    }
}

impl From<TokenPair> for PairEnvelope {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: Some(pair.access),
            refresh_token: Some(pair.refresh),
        }
    }
}

impl TryFrom<PairEnvelope> for TokenPair {
    type Error = CodecError;

    fn try_from(env: PairEnvelope) -> Result<Self> {
        let access = env
            .access_token
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CodecError::Malformed("missing access_token".into()))?;
        let refresh = env
            .refresh_token
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CodecError::Malformed("missing refresh_token".into()))?;
        Ok(Self::new(access, refresh))
    }
}
