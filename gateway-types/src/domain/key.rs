//! Ephemeral encryption key domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier under which an ephemeral key is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(Uuid);

impl KeyId {
    /// Creates a new random KeyId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for KeyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for KeyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// A freshly issued single-use key.
///
/// `key` and `iv` are base64 encoded (32 and 16 raw bytes). The record is
/// handed to the client once; the server keeps only `key` under `key_id`.
#[derive(Clone)]
pub struct EphemeralKey {
    pub key_id: KeyId,
    pub key: String,
    pub iv: String,
}

impl std::fmt::Debug for EphemeralKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKey")
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .field("iv", &self.iv)
            .finish()
    }
}
