//! Compromise notifications.

use async_trait::async_trait;
use pairguard_core::{Identity, OriginIp};
use tokio::sync::Mutex;

/// A pair was presented from an address other than the one it was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompromiseAlert {
    pub identity: Identity,
    /// Resolved through the directory; `None` if it could not be resolved.
    pub contact: Option<String>,
    /// Where the refresh request came from.
    pub origin_ip: OriginIp,
    /// Where the pair was issued to.
    pub token_ip: String,
    /// Unix seconds.
    pub detected_at: i64,
}

impl CompromiseAlert {
    /// A short human-readable message for the owner.
    pub fn message(&self) -> String {
        format!(
            "Someone tried to access your account from IP address {}.",
            self.origin_ip
        )
    }
}

/// Delivers compromise alerts. Delivery is best-effort: the handshake logs
/// and ignores failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_compromise_alert(&self, alert: &CompromiseAlert) -> anyhow::Result<()>;
}

/// Writes alerts to the log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_compromise_alert(&self, alert: &CompromiseAlert) -> anyhow::Result<()> {
        tracing::warn!(
            owner = %alert.identity,
            contact = alert.contact.as_deref().unwrap_or("-"),
            ip = %alert.origin_ip,
            token_ip = %alert.token_ip,
            "compromise alert: {}",
            alert.message()
        );
        Ok(())
    }
}

/// Keeps every alert it is given.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<CompromiseAlert>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn alerts(&self) -> Vec<CompromiseAlert> {
        self.alerts.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.alerts.lock().await.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_compromise_alert(&self, alert: &CompromiseAlert) -> anyhow::Result<()> {
        self.alerts.lock().await.push(alert.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> CompromiseAlert {
        CompromiseAlert {
            identity: Identity::new("alice"),
            contact: Some("alice@example.com".into()),
            origin_ip: OriginIp::parse("10.0.0.2").unwrap(),
            token_ip: "10.0.0.1".into(),
            detected_at: 42,
        }
    }

    #[tokio::test]
    async fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.send_compromise_alert(&alert()).await.unwrap();
        assert_eq!(notifier.count().await, 1);
        assert_eq!(notifier.alerts().await[0].token_ip, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_tracing_notifier_never_fails() {
        TracingNotifier.send_compromise_alert(&alert()).await.unwrap();
    }

    #[test]
    fn test_message_names_origin() {
        assert!(alert().message().contains("10.0.0.2"));
    }
}
