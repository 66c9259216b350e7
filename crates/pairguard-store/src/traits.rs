//! CredentialStore trait: the abstract interface for credential persistence.

use async_trait::async_trait;
use pairguard_core::{CredentialRecord, Identity};

use crate::error::Result;

/// Async interface for refresh-credential persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` is used internally to avoid blocking the runtime.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a freshly issued credential.
    ///
    /// Fails with `Conflict` if a record with the same hash already exists.
    async fn insert(&self, record: &CredentialRecord) -> Result<()>;

    /// All records held for `owner`, newest first.
    ///
    /// Lifetime filtering is left to the caller, which knows the clock.
    async fn list_live(&self, owner: &Identity) -> Result<Vec<CredentialRecord>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Consumption and pruning
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove the record with this hash.
    ///
    /// Returns `true` only if a row was actually removed. Of any number of
    /// concurrent callers, at most one sees `true`.
    async fn delete_by_hash(&self, hash: &str) -> Result<bool>;

    /// Remove every record issued strictly before `cutoff` (Unix seconds).
    ///
    /// Returns the number of rows removed.
    async fn delete_older_than(&self, cutoff: i64) -> Result<u64>;
}
