//! Handshake configuration.
//!
//! Lifetimes and hashing cost live here. The key itself does not: it comes
//! in separately through a [`SecretProvider`] so that configuration can be
//! logged and serialized freely.

use std::time::Duration;

use pairguard_core::Secret;
use serde::{Deserialize, Serialize};

use crate::error::{HandshakeError, Result};

/// Supplies the single symmetric key used for signing and sealing.
pub trait SecretProvider: Send + Sync {
    fn secret(&self) -> &Secret;
}

impl SecretProvider for Secret {
    fn secret(&self) -> &Secret {
        self
    }
}

/// Argon2id cost parameters for stored credential hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Configuration for [`RefreshHandshake`](crate::RefreshHandshake) and
/// [`RevocationSweeper`](crate::RevocationSweeper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Maximum age of a refresh token and its stored credential.
    pub refresh_lifetime_secs: u64,
    /// Maximum age accepted by [`verify_access`](crate::RefreshHandshake::verify_access).
    pub access_lifetime_secs: u64,
    /// How often the sweeper prunes expired credentials.
    pub sweep_interval_secs: u64,
    /// Upper bound on waiting for a compromise notification.
    pub notify_timeout_secs: u64,
    pub hashing: HashingConfig,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            refresh_lifetime_secs: 30 * 24 * 60 * 60,
            access_lifetime_secs: 15 * 60,
            sweep_interval_secs: 5,
            notify_timeout_secs: 5,
            hashing: HashingConfig::default(),
        }
    }
}

impl HandshakeConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HandshakeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the handshake cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_lifetime_secs == 0 {
            return Err(HandshakeError::Config(
                "refresh_lifetime_secs must be positive".into(),
            ));
        }
        if self.access_lifetime_secs == 0 {
            return Err(HandshakeError::Config(
                "access_lifetime_secs must be positive".into(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(HandshakeError::Config(
                "sweep_interval_secs must be positive".into(),
            ));
        }
        argon2::Params::new(
            self.hashing.memory_kib,
            self.hashing.iterations,
            self.hashing.parallelism,
            None,
        )
        .map_err(|e| HandshakeError::Config(format!("hashing: {}", e)))?;
        Ok(())
    }

    pub fn refresh_lifetime(&self) -> i64 {
        secs_i64(self.refresh_lifetime_secs)
    }

    pub fn access_lifetime(&self) -> i64 {
        secs_i64(self.access_lifetime_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }
}

fn secs_i64(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = HandshakeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.refresh_lifetime(), 2_592_000);
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            HandshakeConfig::from_json(r#"{"refresh_lifetime_secs": 60, "hashing": {"iterations": 1}}"#)
                .unwrap();
        assert_eq!(config.refresh_lifetime_secs, 60);
        assert_eq!(config.access_lifetime_secs, 900);
        assert_eq!(config.hashing.iterations, 1);
        assert_eq!(config.hashing.memory_kib, argon2::Params::DEFAULT_M_COST);
    }

    #[test]
    fn test_rejects_zero_lifetime() {
        let err = HandshakeConfig::from_json(r#"{"refresh_lifetime_secs": 0}"#).unwrap_err();
        assert!(matches!(err, HandshakeError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_hashing_params() {
        let config = HandshakeConfig {
            hashing: HashingConfig {
                memory_kib: 1,
                iterations: 1,
                parallelism: 1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_garbage_json() {
        assert!(HandshakeConfig::from_json("not json").is_err());
    }
}
