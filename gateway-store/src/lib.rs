//! # Gateway Store
//!
//! Adapters around ephemeral key material for the payment gateway:
//! - `cipher` - AES-256-CBC with an IV-prefixed, base64 envelope
//! - `memory` - In-memory implementation of the `CacheBackend` port
//! - `key_store` - Namespaced, retrying, optionally compressing key store
//! - `sweeper` - Background task that evicts expired cache entries

pub mod cipher;
mod compression;
pub mod key_store;
pub mod memory;
pub mod retry;
pub mod sweeper;

pub use key_store::{KeyStore, KeyStoreOptions};
pub use memory::MemoryCache;
pub use retry::RetryPolicy;
pub use sweeper::ExpirySweeper;
