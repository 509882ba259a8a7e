//! # Gateway Hex
//!
//! Application service layer and HTTP adapter for the payment gateway.
//!
//! ## Architecture
//!
//! - `processor` - Validation, duplicate suppression and the issuer decision
//! - `service` - Key issuance and the decrypt/process/encrypt pipeline
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `B: CacheBackend`, so the key store can run
//! on any cache adapter.

pub mod inbound;
pub mod openapi;
pub mod processor;
pub mod service;
pub mod trace_registry;

#[cfg(test)]
mod service_tests;

pub use processor::{DelayRange, ProcessingPolicy, TransactionProcessor};
pub use service::GatewayService;
pub use trace_registry::TraceRegistry;
