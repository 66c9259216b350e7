//! Test fixtures and helpers.
//!
//! Common setup for handshake integration tests: an in-memory store, a
//! one-entry directory, a recording notifier and a manual clock.

use std::sync::Arc;

use pairguard::{
    CompromiseAlert, HandshakeConfig, HashingConfig, ManualClock, MemoryDirectory,
    RecordingNotifier, RefreshHandshake,
};
use pairguard_core::{Identity, OriginIp, TokenPair};
use pairguard_store::MemoryStore;

use crate::vectors::{
    foreign_ip, scenario_identity, scenario_ip, scenario_secret, SCENARIO_CONTACT, SCENARIO_NOW,
};

/// The handshake type the fixture builds.
pub type MemoryHandshake = RefreshHandshake<MemoryStore, MemoryDirectory, RecordingNotifier>;

/// Handshake configuration with the cheapest valid Argon2 parameters.
pub fn fast_config() -> HandshakeConfig {
    HandshakeConfig {
        hashing: HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        ..Default::default()
    }
}

/// A handshake wired to in-memory collaborators.
pub struct HandshakeFixture {
    pub handshake: Arc<MemoryHandshake>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub owner: Identity,
}

impl HandshakeFixture {
    /// The scenario owner, registered with a contact address.
    pub fn new() -> Self {
        Self::with_config(fast_config())
    }

    pub fn with_config(config: HandshakeConfig) -> Self {
        let owner = scenario_identity();
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(SCENARIO_NOW));
        let directory =
            MemoryDirectory::new().with_identity(owner.clone(), Some(SCENARIO_CONTACT.into()));

        let handshake = RefreshHandshake::new(
            scenario_secret(),
            store.clone(),
            directory,
            RecordingNotifier::new(),
            config,
        )
        .expect("fixture config is valid")
        .with_clock(clock.clone());

        Self {
            handshake: Arc::new(handshake),
            store,
            clock,
            owner,
        }
    }

    pub fn home(&self) -> OriginIp {
        scenario_ip()
    }

    pub fn foreign(&self) -> OriginIp {
        foreign_ip()
    }

    /// Create a pair for the owner from the home address.
    pub async fn create(&self) -> TokenPair {
        self.handshake
            .create(&self.owner, &self.home())
            .await
            .expect("create for the registered owner")
    }

    pub async fn alerts(&self) -> Vec<CompromiseAlert> {
        self.handshake.notifier().alerts().await
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: i64) {
        self.clock.advance(secs);
    }
}

impl Default for HandshakeFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_create() {
        let fixture = HandshakeFixture::new();
        let pair = fixture.create().await;
        assert_eq!(pair.access().split('.').count(), 3);
        assert_eq!(fixture.store.len(), 1);
        assert!(fixture.alerts().await.is_empty());
    }

    #[test]
    fn test_fast_config_validates() {
        fast_config().validate().unwrap();
    }
}
