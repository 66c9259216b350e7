//! # Pairguard
//!
//! Issuance and single-use rotation of bound access/refresh token pairs,
//! with theft detection.
//!
//! ## Overview
//!
//! - **Create**: a known identity receives a signed access token and a
//!   refresh token sealed against it. The refresh token's Argon2id hash is
//!   stored.
//! - **Refresh**: the pair is validated, the stored credential is consumed
//!   (deleted), and a new pair is issued.
//! - **Theft detection**: a pair presented from an address other than the
//!   one it was issued to is revoked and the owner is notified.
//! - **Sweeping**: a background task deletes credentials past their
//!   lifetime.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pairguard::{
//!     HandshakeConfig, MemoryDirectory, RefreshHandshake, RevocationSweeper, TracingNotifier,
//! };
//! use pairguard::core::{Identity, OriginIp, Secret};
//! use pairguard::store::SqliteStore;
//!
//! async fn example() {
//!     let config = HandshakeConfig::default();
//!     let store = Arc::new(SqliteStore::open("credentials.db").unwrap());
//!     let owner = Identity::parse_uuid("11111111-1111-1111-1111-111111111111").unwrap();
//!     let directory = MemoryDirectory::new().with_identity(owner.clone(), None);
//!
//!     let handshake = RefreshHandshake::new(
//!         Secret::from_bytes([0u8; 32]),
//!         store.clone(),
//!         directory,
//!         TracingNotifier,
//!         config.clone(),
//!     )
//!     .unwrap();
//!     let sweeper = RevocationSweeper::new(store, &config).spawn();
//!
//!     let origin = OriginIp::parse("10.0.0.1:53211").unwrap();
//!     let pair = handshake.create(&owner, &origin).await.unwrap();
//!     let rotated = handshake.refresh(&pair, &origin).await.unwrap();
//!     # let _ = rotated;
//!
//!     sweeper.shutdown().await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pairguard::core` - token codec and data model
//! - `pairguard::store` - credential storage

pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod handshake;
pub mod hasher;
pub mod notify;
pub mod reply;
pub mod sweeper;

pub use pairguard_core as core;
pub use pairguard_store as store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{HandshakeConfig, HashingConfig, SecretProvider};
pub use directory::{IdentityDirectory, MemoryDirectory};
pub use error::{Denial, HandshakeError, Rejection, Result};
pub use handshake::RefreshHandshake;
pub use hasher::CredentialHasher;
pub use notify::{CompromiseAlert, Notifier, RecordingNotifier, TracingNotifier};
pub use reply::{Reply, Status};
pub use sweeper::{RevocationSweeper, SweeperHandle, MIN_SWEEP_INTERVAL};

pub use pairguard_core::{Identity, OriginIp, Secret, TokenPair};
