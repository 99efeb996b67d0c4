//! Per-host request pacing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use url::Url;

/// Serializes request start times per host: every caller reserves the next
/// free slot for its host and sleeps until that slot arrives. Two requests
/// to the same host are always at least `delay` apart; distinct hosts never
/// wait on each other.
#[derive(Debug, Clone)]
pub struct HostPacer {
    delay: Duration,
    slots: Arc<RwLock<HashMap<String, Instant>>>,
}

impl HostPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Wait for this host's next slot. Returns the host, or `None` when the
    /// URL has none worth pacing on.
    pub async fn acquire(&self, url: &str) -> Option<String> {
        let host = extract_host(url)?;
        let slot = {
            let mut slots = self.slots.write().await;
            let now = Instant::now();
            let entry = slots.entry(host.clone()).or_insert(now);
            let slot = (*entry).max(now);
            *entry = slot + self.delay;
            slot
        };
        tokio::time::sleep_until(slot).await;
        Some(host)
    }
}

pub(crate) fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}
