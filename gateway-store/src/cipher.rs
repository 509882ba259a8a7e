//! Symmetric encryption for transaction payloads.
//!
//! Envelope format: `base64(iv || AES-256-CBC-PKCS7(plaintext))`, with a
//! fresh random 16-byte IV drawn for every call to [`encrypt`].

use aes::Aes256;
use base64::{Engine, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use gateway_types::CipherError;
use rand::TryRngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;
/// CBC IV length in bytes.
pub const IV_SIZE: usize = 16;

/// Generates a random 256-bit key, base64 encoded.
pub fn generate_key() -> Result<String, CipherError> {
    let key = random_bytes::<KEY_SIZE>()?;
    Ok(STANDARD.encode(key.as_slice()))
}

/// Generates a random 128-bit IV, base64 encoded.
pub fn generate_iv() -> Result<String, CipherError> {
    let iv = random_bytes::<IV_SIZE>()?;
    Ok(STANDARD.encode(iv.as_slice()))
}

/// True iff `key` is base64 for exactly [`KEY_SIZE`] bytes.
pub fn validate_key(key: &str) -> bool {
    decode_key(key).is_ok()
}

/// Encrypts `plaintext` under `key` and returns the envelope.
pub fn encrypt(plaintext: &[u8], key: &str) -> Result<String, CipherError> {
    let key = decode_key(key)?;
    if plaintext.is_empty() {
        return Err(CipherError::InvalidFormat(
            "data to encrypt cannot be empty".into(),
        ));
    }

    let iv = random_bytes::<IV_SIZE>()?;
    let ciphertext = Aes256CbcEnc::new_from_slices(&key, iv.as_slice())
        .map_err(|_| CipherError::InvalidKey)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut envelope = Vec::with_capacity(IV_SIZE + ciphertext.len());
    envelope.extend_from_slice(iv.as_slice());
    envelope.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(envelope))
}

/// Opens an envelope produced by [`encrypt`].
pub fn decrypt(encoded: &str, key: &str) -> Result<Vec<u8>, CipherError> {
    let key = decode_key(key)?;
    if encoded.trim().is_empty() {
        return Err(CipherError::InvalidFormat(
            "encrypted data cannot be empty".into(),
        ));
    }

    let envelope = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CipherError::InvalidFormat(e.to_string()))?;
    if envelope.len() < IV_SIZE {
        return Err(CipherError::InvalidFormat(format!(
            "envelope is {} bytes, shorter than the IV",
            envelope.len()
        )));
    }

    let (iv, body) = envelope.split_at(IV_SIZE);
    if body.is_empty() || body.len() % IV_SIZE != 0 {
        return Err(CipherError::Decrypt);
    }

    Aes256CbcDec::new_from_slices(&key, iv)
        .map_err(|_| CipherError::InvalidKey)?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| CipherError::Decrypt)
}

fn decode_key(key: &str) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let bytes = Zeroizing::new(
        STANDARD
            .decode(key.trim())
            .map_err(|_| CipherError::InvalidKey)?,
    );
    if bytes.len() != KEY_SIZE {
        return Err(CipherError::InvalidKey);
    }
    Ok(bytes)
}

fn random_bytes<const N: usize>() -> Result<Zeroizing<[u8; N]>, CipherError> {
    let mut buf = Zeroizing::new([0u8; N]);
    OsRng
        .try_fill_bytes(buf.as_mut_slice())
        .map_err(|e| CipherError::KeyGeneration(e.to_string()))?;
    Ok(buf)
}
