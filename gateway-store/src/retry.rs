//! Retry with linear backoff for cache operations.

use std::future::Future;
use std::time::Duration;

use gateway_types::{CacheError, StoreError};
use tokio::time::{sleep, timeout};
use tracing::warn;

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// How many times to retry a failed cache call and how long to wait.
///
/// The wait before retry `n` (1-based) is `base_delay * n`. A single
/// attempt that runs past `attempt_timeout` counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(300))
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub const fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Fail on the first error.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Runs `op` until it succeeds or the retries are used up.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        let mut retries = 0;
        loop {
            let attempt = timeout(self.attempt_timeout, op())
                .await
                .unwrap_or_else(|_| {
                    Err(CacheError::Unavailable(format!(
                        "timed out after {}ms",
                        self.attempt_timeout.as_millis()
                    )))
                });
            match attempt {
                Ok(value) => return Ok(value),
                Err(e) if retries < self.max_retries => {
                    retries += 1;
                    let delay = self.delay_for(retries);
                    warn!(
                        operation,
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "cache operation failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    return Err(StoreError::Unavailable {
                        attempts: retries + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}
