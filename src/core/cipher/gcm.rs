//! AES-256-GCM backend implementation.
//!
//! Seals with a fresh random 96-bit nonce per call and no associated data.
//! Output is `nonce || ciphertext || tag`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use tracing::trace;

use super::{Blob, Cipher};
use crate::core::constants::{KEY_SIZE, NONCE_SIZE};
use crate::error::{CryptoError, CryptoResult};

/// AES-256-GCM backend
pub struct Gcm;

impl Gcm {
    fn cipher(key: &[u8]) -> CryptoResult<Aes256Gcm> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::key_size(key.len()));
        }
        Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    fn nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce).map_err(|e| {
            CryptoError::EncryptionFailed(format!("nonce generation failed: {}", e))
        })?;
        Ok(nonce)
    }
}

impl Cipher for Gcm {
    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }

    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let cipher = Self::cipher(key)?;
        let nonce = Self::nonce()?;

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);

        trace!(ciphertext_len = blob.len(), "encrypted");
        Ok(blob)
    }

    fn decrypt(&self, ciphertext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting");

        if key.len() != KEY_SIZE {
            return Err(CryptoError::key_size(key.len()));
        }
        let blob = Blob::parse(ciphertext)?;
        let cipher = Self::cipher(key)?;

        // Wrong key and tampering are indistinguishable here.
        let plaintext = cipher
            .decrypt(Nonce::from_slice(blob.nonce()), blob.sealed())
            .map_err(|_| CryptoError::DecryptionFailed)?;

        trace!(plaintext_len = plaintext.len(), "decrypted");
        Ok(plaintext)
    }
}
