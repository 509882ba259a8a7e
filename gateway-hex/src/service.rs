//! Gateway Application Service
//!
//! Issues single-use keys and runs the encrypted submission pipeline:
//! key lookup, decrypt, parse, process, encrypt. Contains no HTTP logic.

use gateway_store::{KeyStore, cipher};
use gateway_types::{
    CacheBackend, EncryptionKeyResponse, EphemeralKey, GatewayError, KeyId, Transaction,
    TransactionRequest,
};
use tracing::{error, info, instrument};
use zeroize::Zeroizing;

use crate::TransactionProcessor;

/// Application service for the gateway.
///
/// Generic over `B: CacheBackend` - the key store's adapter is injected at
/// compile time.
pub struct GatewayService<B: CacheBackend> {
    keys: KeyStore<B>,
    processor: TransactionProcessor,
}

impl<B: CacheBackend> GatewayService<B> {
    pub fn new(keys: KeyStore<B>, processor: TransactionProcessor) -> Self {
        Self { keys, processor }
    }

    pub fn key_store(&self) -> &KeyStore<B> {
        &self.keys
    }

    pub fn processor(&self) -> &TransactionProcessor {
        &self.processor
    }

    /// Generates a fresh key and IV and stores the key under a new identifier.
    #[instrument(skip(self))]
    pub async fn issue_key(&self) -> Result<EncryptionKeyResponse, GatewayError> {
        let issued = EphemeralKey {
            key_id: KeyId::new(),
            key: cipher::generate_key()?,
            iv: cipher::generate_iv()?,
        };

        self.keys
            .store_key(&issued.key_id.to_string(), &issued.key, None)
            .await?;

        info!(key_id = %issued.key_id, "Issued encryption key");
        Ok(issued.into())
    }

    /// Processes an encrypted transaction and returns the encrypted response.
    ///
    /// Once the key has been found it is removed exactly once, whatever the
    /// outcome.
    #[instrument(skip(self, envelope))]
    pub async fn submit(&self, key_id: &str, envelope: &str) -> Result<String, GatewayError> {
        let key_id: KeyId = key_id
            .parse()
            .map_err(|_| GatewayError::invalid_or_expired_key())?;
        let identifier = key_id.to_string();

        let key = self
            .keys
            .get_key(&identifier)
            .await?
            .map(Zeroizing::new)
            .ok_or_else(GatewayError::invalid_or_expired_key)?;

        let outcome = self.handle(&key, envelope).await;

        if let Err(e) = self.keys.remove_key(&identifier).await {
            error!(key_id = %key_id, error = %e, "Failed to remove used encryption key");
        }

        outcome
    }

    async fn handle(&self, key: &str, envelope: &str) -> Result<String, GatewayError> {
        let plaintext = Zeroizing::new(cipher::decrypt(envelope, key)?);
        let request: TransactionRequest = serde_json::from_slice(&plaintext)?;
        let tx = Transaction::from(request);

        let response = self.processor.process(&tx).await?;

        let body = serde_json::to_vec(&response)
            .map_err(|e| GatewayError::System(format!("Failed to encode response: {e}")))?;
        Ok(cipher::encrypt(&body, key)?)
    }
}
