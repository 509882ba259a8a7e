//! In-process `CacheBackend` with per-entry deadlines.
//!
//! Expired entries are invisible to readers immediately and are physically
//! removed either lazily on access or by [`MemoryCache::purge_expired`].

use std::time::{Duration, Instant};

use dashmap::DashMap;
use gateway_types::{CacheBackend, CacheError};

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryCache {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Backend(format!("ttl {ttl:?} is out of range")))?;
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        cache
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"value".to_vec()));
        assert!(cache.exists("k").await.unwrap());
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_entry() {
        let cache = MemoryCache::new();
        cache.set("k", b"one".to_vec(), Duration::from_secs(60)).await.unwrap();
        cache.set("k", b"two".to_vec(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let cache = MemoryCache::new();
        cache
            .set("short", b"v".to_vec(), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.get("short").await.unwrap(), None);
        // lazy removal on read
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_expired_entry_reports_false() {
        let cache = MemoryCache::new();
        cache.set("k", b"v".to_vec(), Duration::ZERO).await.unwrap();
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set("a", b"1".to_vec(), Duration::ZERO).await.unwrap();
        cache.set("b", b"2".to_vec(), Duration::ZERO).await.unwrap();
        cache.set("c", b"3".to_vec(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.exists("c").await.unwrap());
    }
}
