//! Error types for the payment gateway.
//!
//! Each layer owns one enum; everything converges into [`GatewayError`],
//! whose [`ErrorKind`] is what callers see in the result envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Domain-level errors (business rule violations).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicate transaction: trace {0} was already processed")]
    DuplicateTrace(String),
}

/// Compact record encode/decode failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Compact record must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Field {0} is empty")]
    EmptyField(&'static str),

    #[error("Invalid {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: bcd_codec::BcdError,
    },

    #[error("Processing code must be exactly 6 digits, got {0}")]
    ProcessingCodeLength(usize),

    #[error("Card number must be exactly 16 digits, got {0}")]
    CardNumberLength(usize),

    #[error("Amount {0} cannot be encoded as 12 digits of minor units")]
    AmountOutOfRange(String),

    #[error("Expiry date must be MM/YY or MMYY, got {0:?}")]
    ExpiryFormat(String),

    #[error("Field {field} has non-zero padding in {digits}")]
    NonZeroPadding { field: &'static str, digits: String },

    #[error("Unknown function code {0}")]
    UnknownFunctionCode(String),
}

/// Symmetric cipher failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    #[error("Failed to generate key material: {0}")]
    KeyGeneration(String),

    #[error("Invalid encryption key")]
    InvalidKey,

    #[error("Invalid encrypted data format: {0}")]
    InvalidFormat(String),

    #[error("Failed to decrypt data")]
    Decrypt,
}

/// Cache backend failures (transient, retried by the key store).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Key store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Key store unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },

    #[error("Stored value could not be (de)compressed: {0}")]
    Compression(String),
}

/// Error category carried in-band by the result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "DuplicateError")]
    Duplicate,
    #[serde(rename = "KeyError")]
    Key,
    #[serde(rename = "CodecError")]
    Codec,
    #[serde(rename = "StoreUnavailable")]
    StoreUnavailable,
    #[serde(rename = "SystemError")]
    System,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Duplicate => "DuplicateError",
            ErrorKind::Key => "KeyError",
            ErrorKind::Codec => "CodecError",
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::System => "SystemError",
        };
        f.write_str(name)
    }
}

/// Application-level errors (for the result envelope).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicate transaction: {0}")]
    Duplicate(String),

    #[error("{0}")]
    Key(String),

    #[error("{0}")]
    Codec(String),

    #[error("Key store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    System(String),
}

impl GatewayError {
    /// Shorthand for a single-rule validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(vec![message.into()])
    }

    /// The key a caller presented is unknown, expired, or already used.
    pub fn invalid_or_expired_key() -> Self {
        GatewayError::Key("Invalid or expired key".into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::Duplicate(_) => ErrorKind::Duplicate,
            GatewayError::Key(_) => ErrorKind::Key,
            GatewayError::Codec(_) => ErrorKind::Codec,
            GatewayError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            GatewayError::System(_) => ErrorKind::System,
        }
    }
}

impl From<DomainError> for GatewayError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => GatewayError::Validation(errors),
            DomainError::DuplicateTrace(trace) => GatewayError::Duplicate(trace),
        }
    }
}

impl From<CodecError> for GatewayError {
    fn from(err: CodecError) -> Self {
        GatewayError::Codec(err.to_string())
    }
}

impl From<CipherError> for GatewayError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::KeyGeneration(_) | CipherError::InvalidKey => {
                GatewayError::Key(err.to_string())
            }
            CipherError::InvalidFormat(_) | CipherError::Decrypt => {
                GatewayError::Codec(err.to_string())
            }
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { .. } => GatewayError::StoreUnavailable(err.to_string()),
            StoreError::Compression(e) => GatewayError::System(e),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Codec(format!("Invalid transaction data: {}", err))
    }
}
