//! Namespaced storage of ephemeral encryption keys.
//!
//! Every identifier is stored under `instance_name + key_prefix + identifier`.
//! Values are optionally zstd-compressed and every backend call is wrapped in
//! the configured [`RetryPolicy`].

use std::time::Duration;

use gateway_types::{CacheBackend, StoreError};
use tracing::{debug, info, instrument};

use crate::RetryPolicy;
use crate::compression::{compress, decompress};

#[derive(Debug, Clone)]
pub struct KeyStoreOptions {
    pub instance_name: String,
    pub key_prefix: String,
    pub default_ttl: Duration,
    pub compression: bool,
    pub retry: RetryPolicy,
}

impl Default for KeyStoreOptions {
    fn default() -> Self {
        Self {
            instance_name: "PaymentGateway_".to_string(),
            key_prefix: "keys:".to_string(),
            default_ttl: Duration::from_secs(5 * 60),
            compression: true,
            retry: RetryPolicy::default(),
        }
    }
}

pub struct KeyStore<B: CacheBackend> {
    backend: B,
    options: KeyStoreOptions,
}

impl<B: CacheBackend> KeyStore<B> {
    pub fn new(backend: B, options: KeyStoreOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &KeyStoreOptions {
        &self.options
    }

    pub fn full_key(&self, identifier: &str) -> String {
        format!(
            "{}{}{}",
            self.options.instance_name, self.options.key_prefix, identifier
        )
    }

    /// Stores `key` under `identifier` for `ttl` (or the default TTL).
    #[instrument(skip(self, key))]
    pub async fn store_key(
        &self,
        identifier: &str,
        key: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let full_key = self.full_key(identifier);
        let ttl = ttl.unwrap_or(self.options.default_ttl);
        let value = if self.options.compression {
            compress(key.as_bytes())?
        } else {
            key.as_bytes().to_vec()
        };

        self.options
            .retry
            .run("store_key", || self.backend.set(&full_key, value.clone(), ttl))
            .await?;

        info!(ttl_secs = ttl.as_secs(), "Stored encryption key");
        Ok(())
    }

    /// Returns the key for `identifier`, or `None` if absent or expired.
    #[instrument(skip(self))]
    pub async fn get_key(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        let full_key = self.full_key(identifier);
        let stored = self
            .options
            .retry
            .run("get_key", || self.backend.get(&full_key))
            .await?;

        let Some(bytes) = stored else {
            debug!("Encryption key not found");
            return Ok(None);
        };

        let bytes = if self.options.compression {
            decompress(&bytes)?
        } else {
            bytes
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::Compression(e.to_string()))
    }

    /// Removes the key; returns whether a live key existed.
    #[instrument(skip(self))]
    pub async fn remove_key(&self, identifier: &str) -> Result<bool, StoreError> {
        let full_key = self.full_key(identifier);
        let removed = self
            .options
            .retry
            .run("remove_key", || self.backend.delete(&full_key))
            .await?;
        if removed {
            info!("Removed encryption key");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub async fn key_exists(&self, identifier: &str) -> Result<bool, StoreError> {
        let full_key = self.full_key(identifier);
        self.options
            .retry
            .run("key_exists", || self.backend.exists(&full_key))
            .await
    }
}
