//! # Gateway Client SDK
//!
//! A typed Rust client for the payment gateway API. It handles the key
//! exchange and payload encryption, so callers deal in plain
//! [`TransactionRequest`] and [`TransactionResponse`] values.

use gateway_store::cipher;
use gateway_types::{
    ApiResult, CipherError, CodecError, CompactRecord, EncryptionKeyResponse, ErrorKind,
    Transaction, TransactionRequest, TransactionResponse,
};
use rand::Rng;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Header carrying the identifier of the key used to encrypt a submission.
pub const KEY_IDENTIFIER_HEADER: &str = "X-Key-Identifier";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("{kind}: {message}")]
    Gateway { kind: ErrorKind, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encryption error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// The gateway's error category, when the server rejected the request.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Gateway { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Payment gateway API client.
pub struct GatewayClient {
    base_url: String,
    http: Client,
}

impl GatewayClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Requests a fresh single-use key.
    pub async fn request_key(&self) -> Result<EncryptionKeyResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/encryption/key", self.base_url))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Fetches a key, then encrypts and submits `request` under it.
    pub async fn submit(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        let key = self.request_key().await?;
        self.submit_with_key(&key, request).await
    }

    /// Encrypts and submits `request` under an already issued key.
    pub async fn submit_with_key(
        &self,
        key: &EncryptionKeyResponse,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        let envelope = cipher::encrypt(&serde_json::to_vec(request)?, &key.key)?;
        tracing::debug!(key_id = %key.key_identifier, trace = %request.system_trace_nr, "Submitting transaction");

        let reply = self.process(&key.key_identifier, &envelope).await?;
        let plaintext = cipher::decrypt(&reply, &key.key)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Posts a raw envelope; returns the encrypted response envelope.
    pub async fn process(&self, key_id: &str, envelope: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/transaction/process", self.base_url))
            .header(KEY_IDENTIFIER_HEADER, key_id)
            .json(envelope)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let envelope: ApiResult<T> = serde_json::from_str(&body)?;
        envelope
            .into_result()
            .map_err(|(kind, message)| ClientError::Gateway { kind, message })
    }
}

/// Encodes `tx` into its 28-byte compact record.
pub fn compact(tx: &Transaction) -> Result<CompactRecord, ClientError> {
    Ok(CompactRecord::encode(tx)?)
}

/// Decodes a compact record back into a transaction (cardholder empty).
pub fn expand(bytes: &[u8]) -> Result<Transaction, ClientError> {
    Ok(CompactRecord::decode(bytes)?)
}

/// Random six-digit trace number in `100000..=999999`.
pub fn generate_trace_number() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}
