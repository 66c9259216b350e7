//! SQLite implementation of the CredentialStore trait.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};

use pairguard_core::{CredentialRecord, Identity};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::CredentialStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn insert(&self, record: &CredentialRecord) -> Result<()> {
        let record = record.clone();

        self.blocking(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO credentials (hash, owner_id, issued_at) VALUES (?1, ?2, ?3)",
                params![record.hash, record.owner.as_str(), record.issued_at],
            );
            match inserted {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::conflict(&record.hash))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn list_live(&self, owner: &Identity) -> Result<Vec<CredentialRecord>> {
        let owner = owner.clone();

        self.blocking(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT hash, issued_at FROM credentials
                 WHERE owner_id = ?1
                 ORDER BY issued_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map(params![owner.as_str()], |row| {
                Ok(CredentialRecord::new(
                    owner.clone(),
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                ))
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::from)
        })
        .await
    }

    async fn delete_by_hash(&self, hash: &str) -> Result<bool> {
        let hash = hash.to_string();

        self.blocking(move |conn| {
            let removed = conn.execute("DELETE FROM credentials WHERE hash = ?1", params![hash])?;
            Ok(removed == 1)
        })
        .await
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        self.blocking(move |conn| {
            let removed =
                conn.execute("DELETE FROM credentials WHERE issued_at < ?1", params![cutoff])?;
            if removed > 0 {
                tracing::debug!(removed, cutoff, "pruned expired credentials");
            }
            Ok(removed as u64)
        })
        .await
    }
}
