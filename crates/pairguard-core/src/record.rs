//! The server-side credential row.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// One live refresh credential: the slow hash of a refresh token, its owner,
/// and when it was issued (Unix seconds).
///
/// Exactly one record exists per outstanding pair. It is removed once, either
/// by a successful rotation or by the sweeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub owner: Identity,
    pub hash: String,
    pub issued_at: i64,
}

impl CredentialRecord {
    pub fn new(owner: Identity, hash: impl Into<String>, issued_at: i64) -> Self {
        Self {
            owner,
            hash: hash.into(),
            issued_at,
        }
    }

    /// Whether the record is still within `lifetime_secs` at `now`.
    pub fn is_live(&self, now: i64, lifetime_secs: i64) -> bool {
        self.issued_at.saturating_add(lifetime_secs) > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_boundary() {
        let rec = CredentialRecord::new(Identity::new("u"), "h", 100);
        assert!(rec.is_live(100, 10));
        assert!(rec.is_live(109, 10));
        assert!(!rec.is_live(110, 10));
    }
}
