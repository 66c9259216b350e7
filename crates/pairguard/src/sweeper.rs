//! Background pruning of expired credentials.

use std::sync::Arc;
use std::time::Duration;

use pairguard_store::CredentialStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::clock::{Clock, SystemClock};
use crate::config::HandshakeConfig;
use crate::error::Result;

/// Shortest tick the loop accepts. `tokio::time::interval` panics on zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Deletes credentials older than the refresh lifetime on a fixed interval.
pub struct RevocationSweeper<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    lifetime: i64,
    interval: Duration,
}

impl<S: CredentialStore + 'static> RevocationSweeper<S> {
    pub fn new(store: Arc<S>, config: &HandshakeConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            lifetime: config.refresh_lifetime(),
            interval: config.sweep_interval(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the tick interval. Sub-second intervals are allowed; anything
    /// below [`MIN_SWEEP_INTERVAL`] is raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    /// Run one pass. Returns the number of records removed.
    pub async fn sweep_once(&self) -> Result<u64> {
        let cutoff = self.clock.now().saturating_sub(self.lifetime);
        let removed = self.store.delete_older_than(cutoff).await?;
        debug!(removed, cutoff, "credential sweep finished");
        Ok(removed)
    }

    /// Start the loop on the current runtime.
    ///
    /// The loop runs until [`SweeperHandle::shutdown`] is called or the handle
    /// is dropped. Failed passes are logged and the loop carries on.
    pub fn spawn(self) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.sweep_once().await {
                            error!(error = %e, "credential sweep failed");
                        }
                    }
                }
            }

            debug!("credential sweeper stopped");
        });

        SweeperHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Handle to a running sweeper.
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "credential sweeper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use pairguard_core::{CredentialRecord, Identity};
    use pairguard_store::MemoryStore;

    const LIFETIME: u64 = 100;

    fn config() -> HandshakeConfig {
        HandshakeConfig {
            refresh_lifetime_secs: LIFETIME,
            ..Default::default()
        }
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let owner = Identity::new("alice");
        for (hash, ts) in [("old", 0), ("edge", 900), ("new", 950)] {
            store
                .insert(&CredentialRecord::new(owner.clone(), hash, ts))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_sweep_once_cutoff() {
        let store = seeded_store().await;
        let sweeper = RevocationSweeper::new(store.clone(), &config())
            .with_clock(Arc::new(ManualClock::new(1_000)));

        // cutoff = 900: strictly older rows go
        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_spawned_loop_prunes_and_stops() {
        let store = seeded_store().await;
        let clock = Arc::new(ManualClock::new(1_000));
        let handle = RevocationSweeper::new(store.clone(), &config())
            .with_clock(clock.clone())
            .with_interval(Duration::from_millis(10))
            .spawn();

        clock.set(10_000);
        for _ in 0..200 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let store = seeded_store().await;
        let sweeper = RevocationSweeper::new(store.clone(), &config())
            .with_clock(Arc::new(ManualClock::new(10_000)))
            .with_interval(Duration::ZERO);
        assert_eq!(sweeper.interval, MIN_SWEEP_INTERVAL);

        let handle = sweeper.spawn();
        for _ in 0..200 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(store.is_empty());
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_loop() {
        let store = Arc::new(MemoryStore::new());
        let handle = RevocationSweeper::new(store, &config())
            .with_interval(Duration::from_millis(10))
            .spawn();
        let SweeperHandle { stop, task } = handle;
        drop(stop);

        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("sweeper should exit when its handle is dropped")
            .unwrap();
    }
}
