//! Identity directory: who exists, and how to reach them.

use std::collections::HashMap;

use async_trait::async_trait;
use pairguard_core::Identity;
use tokio::sync::RwLock;

/// Resolves identities owned by the embedding application.
///
/// Errors are opaque to the handshake; it logs them and fails closed.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Whether `id` names a known owner.
    async fn lookup(&self, id: &Identity) -> anyhow::Result<bool>;

    /// Where to send security notifications for `id`, if anywhere.
    async fn contact_for(&self, id: &Identity) -> anyhow::Result<Option<String>>;
}

/// An in-memory directory.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: RwLock<HashMap<Identity, Option<String>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_identity(mut self, id: Identity, contact: Option<String>) -> Self {
        self.entries.get_mut().insert(id, contact);
        self
    }

    pub async fn register(&self, id: Identity, contact: Option<String>) {
        self.entries.write().await.insert(id, contact);
    }

    pub async fn remove(&self, id: &Identity) -> bool {
        self.entries.write().await.remove(id).is_some()
    }
}

#[async_trait]
impl IdentityDirectory for MemoryDirectory {
    async fn lookup(&self, id: &Identity) -> anyhow::Result<bool> {
        Ok(self.entries.read().await.contains_key(id))
    }

    async fn contact_for(&self, id: &Identity) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(id) {
            Some(contact) => Ok(contact.clone()),
            None => anyhow::bail!("identity {} not found", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_directory() {
        let alice = Identity::new("alice");
        let dir = MemoryDirectory::new().with_identity(alice.clone(), Some("alice@example.com".into()));

        assert!(dir.lookup(&alice).await.unwrap());
        assert_eq!(
            dir.contact_for(&alice).await.unwrap().as_deref(),
            Some("alice@example.com")
        );

        let bob = Identity::new("bob");
        assert!(!dir.lookup(&bob).await.unwrap());
        assert!(dir.contact_for(&bob).await.is_err());

        dir.register(bob.clone(), None).await;
        assert!(dir.lookup(&bob).await.unwrap());
        assert!(dir.contact_for(&bob).await.unwrap().is_none());

        assert!(dir.remove(&bob).await);
        assert!(!dir.lookup(&bob).await.unwrap());
    }
}
