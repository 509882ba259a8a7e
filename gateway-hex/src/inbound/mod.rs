//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

pub mod handlers;
mod server;

pub use handlers::KEY_IDENTIFIER_HEADER;
pub use server::HttpServer;
