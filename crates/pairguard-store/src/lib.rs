//! # Pairguard Store
//!
//! Storage abstraction for refresh credentials. Provides a trait-based
//! interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The handshake never touches a database directly; it talks to a
//! [`CredentialStore`]. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for tests and single-process deployments.
//!
//! ## Key Types
//!
//! - [`CredentialStore`] - The async trait for all credential operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pairguard_core::{CredentialRecord, Identity};
//! use pairguard_store::{CredentialStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("credentials.db").unwrap();
//!
//!     let owner = Identity::new("11111111-1111-1111-1111-111111111111");
//!     let record = CredentialRecord::new(owner.clone(), "$argon2id$...", 1_700_000_000);
//!     store.insert(&record).await.unwrap();
//!
//!     let live = store.list_live(&owner).await.unwrap();
//!     assert_eq!(live.len(), 1);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Consumption is a delete**: [`CredentialStore::delete_by_hash`] reports
//!   whether it removed a row, and only that caller may treat the credential
//!   as consumed. A prior `list_live` says nothing about races.
//! - **Pruning is idempotent**: deleting rows older than a cutoff can race
//!   with handshake deletes of the same row without harm.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::CredentialStore;
