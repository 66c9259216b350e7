//! Slow salted hashing of refresh tokens for storage.
//!
//! Hashes are Argon2id PHC strings, so each one carries its own salt and
//! cost parameters. All work runs on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use pairguard_core::CredentialRecord;

use crate::config::HashingConfig;
use crate::error::{HandshakeError, Result};

/// Hashes and verifies refresh tokens.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(config: &HashingConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| HandshakeError::Config(format!("hashing: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a refresh token into a PHC string.
    pub async fn hash(&self, token: &str) -> Result<String> {
        let params = self.params.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(token.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| HandshakeError::Internal(format!("hashing failed: {}", e)))
        })
        .await
        .map_err(|e| HandshakeError::Internal(format!("hashing task failed: {}", e)))?
    }

    /// The first record whose hash matches `token`, in the given order.
    ///
    /// Unparseable hashes never match.
    pub async fn find_match(
        &self,
        token: &str,
        records: Vec<CredentialRecord>,
    ) -> Result<Option<CredentialRecord>> {
        let params = self.params.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let argon2 = Self::argon2(params);
            Ok(records.into_iter().find(|record| {
                PasswordHash::new(&record.hash)
                    .map(|parsed| argon2.verify_password(token.as_bytes(), &parsed).is_ok())
                    .unwrap_or(false)
            }))
        })
        .await
        .map_err(|e| HandshakeError::Internal(format!("hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairguard_core::Identity;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(&HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let hasher = hasher();
        let a = hasher.hash("token").await.unwrap();
        let b = hasher.hash("token").await.unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_find_match() {
        let hasher = hasher();
        let owner = Identity::new("alice");
        let records = vec![
            CredentialRecord::new(owner.clone(), "not a phc string", 3),
            CredentialRecord::new(owner.clone(), hasher.hash("other").await.unwrap(), 2),
            CredentialRecord::new(owner.clone(), hasher.hash("token").await.unwrap(), 1),
        ];

        let found = hasher.find_match("token", records.clone()).await.unwrap();
        assert_eq!(found.map(|r| r.issued_at), Some(1));

        assert!(hasher.find_match("missing", records).await.unwrap().is_none());
    }
}
