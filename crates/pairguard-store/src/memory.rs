//! In-memory implementation of the CredentialStore trait.
//!
//! Same semantics as SQLite, nothing persisted. Every mutation happens under
//! the write lock, so `delete_by_hash` is trivially single-winner.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pairguard_core::{CredentialRecord, Identity};

use crate::error::{Result, StoreError};
use crate::traits::CredentialStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by hash.
    records: HashMap<String, CredentialRecord>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: HashMap::new(),
            }),
        }
    }

    /// Number of records currently held.
    ///
    /// Counts through a poisoned lock: every mutation is a single map
    /// operation, so the map is whole even if a holder panicked. The trait
    /// methods still report poisoning as [`StoreError::Poisoned`].
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, record: &CredentialRecord) -> Result<()> {
        let mut inner = self.write()?;
        if inner.records.contains_key(&record.hash) {
            return Err(StoreError::conflict(&record.hash));
        }
        inner.records.insert(record.hash.clone(), record.clone());
        Ok(())
    }

    async fn list_live(&self, owner: &Identity) -> Result<Vec<CredentialRecord>> {
        let inner = self.read()?;
        let mut records: Vec<CredentialRecord> = inner
            .records
            .values()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(records)
    }

    async fn delete_by_hash(&self, hash: &str) -> Result<bool> {
        let mut inner = self.write()?;
        Ok(inner.records.remove(hash).is_some())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        let mut inner = self.write()?;
        let before = inner.records.len();
        inner.records.retain(|_, r| r.issued_at >= cutoff);
        Ok((before - inner.records.len()) as u64)
    }
}
