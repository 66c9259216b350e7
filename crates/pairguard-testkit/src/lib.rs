//! # Pairguard Testkit
//!
//! Testing utilities for Pairguard.
//!
//! ## Overview
//!
//! - **Vectors**: the fixed scenario values and envelope request vectors
//! - **Generators**: proptest strategies for secrets, identities, origins
//! - **Fixtures**: a handshake wired to in-memory collaborators
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pairguard_core::validate_pair;
//! use pairguard_testkit::generators::{pair_from_params, PairParams};
//!
//! proptest! {
//!     #[test]
//!     fn issued_pairs_validate(params: PairParams) {
//!         let pair = pair_from_params(&params);
//!         prop_assert!(validate_pair(&params.secret, &pair).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use pairguard_testkit::HandshakeFixture;
//!
//! async fn example() {
//!     let fixture = HandshakeFixture::new();
//!     let pair = fixture.create().await;
//!     let rotated = fixture.handshake.refresh(&pair, &fixture.home()).await.unwrap();
//!     # let _ = rotated;
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{fast_config, HandshakeFixture, MemoryHandshake};
pub use generators::{pair_from_params, PairParams};
pub use vectors::{envelope_vectors, EnvelopeVector};
