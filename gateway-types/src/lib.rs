//! # Gateway Types
//!
//! Domain types and port traits for the encrypted card transaction gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, the compact wire codec, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Transaction, card rules, compact record)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects and the result envelope for API boundaries
//! - `error/` - Error taxonomy shared by every layer

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    COMPACT_RECORD_LEN, CompactRecord, EphemeralKey, FunctionCode, KeyId, ResponseCode,
    Transaction,
};
pub use dto::*;
pub use error::{
    CacheError, CipherError, CodecError, DomainError, ErrorKind, GatewayError, StoreError,
};
pub use ports::CacheBackend;
