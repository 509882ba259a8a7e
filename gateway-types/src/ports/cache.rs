//! Cache backend port trait.
//!
//! The key store sits on top of this trait. Adapters (in-memory, a
//! networked cache) implement it; expiry is the backend's job.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CacheError;

/// A byte-oriented key/value cache with per-entry time-to-live.
///
/// Errors are treated as transient by callers and may be retried.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Returns the live value for `key`, or `None` if missing or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Deletes `key`; returns whether a live entry existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;
}

#[async_trait::async_trait]
impl<B: CacheBackend> CacheBackend for Arc<B> {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        (**self).set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        (**self).delete(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key).await
    }
}
