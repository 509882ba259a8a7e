use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument};

use crate::MemoryCache;

/// Periodically evicts expired entries from a [`MemoryCache`].
pub struct ExpirySweeper {
    cache: Arc<MemoryCache>,
    interval: Duration,
}

impl ExpirySweeper {
    /// `interval` is clamped to at least one millisecond.
    pub fn new(cache: Arc<MemoryCache>, interval: Duration) -> Self {
        Self {
            cache,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Runs one sweep and returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(purged, remaining = self.cache.len(), "Evicted expired keys");
        }
        purged
    }

    #[instrument(skip(self))]
    pub async fn run(self) {
        info!("Starting expiry sweeper every {:?}", self.interval);
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.sweep();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_types::CacheBackend;

    #[tokio::test]
    async fn test_sweep_evicts_only_expired() {
        let cache = Arc::new(MemoryCache::new());
        cache.set("old", b"x".to_vec(), Duration::ZERO).await.unwrap();
        cache
            .set("fresh", b"y".to_vec(), Duration::from_secs(300))
            .await
            .unwrap();

        let sweeper = ExpirySweeper::new(cache.clone(), Duration::from_secs(30));
        assert_eq!(sweeper.sweep(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_background_sweeper_runs() {
        let cache = Arc::new(MemoryCache::new());
        cache.set("old", b"x".to_vec(), Duration::ZERO).await.unwrap();

        let handle = tokio::spawn(
            ExpirySweeper::new(cache.clone(), Duration::from_millis(10)).run(),
        );
        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.abort();

        assert!(cache.is_empty());
    }
}
