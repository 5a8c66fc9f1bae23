//! Authenticated encryption.
//!
//! Raw encrypt/decrypt over a 256-bit key and an arbitrary byte payload,
//! plus base64 text variants. AES-256-GCM is the only backend.
//!
//! ## Blob format
//!
//! Every ciphertext is `nonce(12) || ciphertext || tag(16)`; see [`Blob`].
//! Outside the process blobs travel as standard base64 with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::error::CryptoResult;

mod blob;
mod gcm;

pub use blob::Blob;
pub use gcm::Gcm;

/// Symmetric AEAD backend trait.
pub trait Cipher {
    /// Seal `plaintext` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeySize` if `key` is not 32 bytes, or
    /// `CryptoError::EncryptionFailed` if the cipher or nonce source fails.
    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Open a blob produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeySize`, `CryptoError::InvalidCiphertext`
    /// for blobs shorter than 28 bytes, or `CryptoError::DecryptionFailed`
    /// when the tag does not verify.
    fn decrypt(&self, ciphertext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// Encrypt bytes with AES-256-GCM.
///
/// Two calls with the same input never return the same blob.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    Gcm.encrypt(plaintext, key)
}

/// Decrypt an AES-256-GCM blob.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    Gcm.decrypt(ciphertext, key)
}

/// Encrypt a string and return the blob as base64.
pub fn encrypt_string(plaintext: &str, key: &[u8]) -> CryptoResult<String> {
    let blob = encrypt(plaintext.as_bytes(), key)?;
    Ok(to_base64(&blob))
}

/// Decrypt a base64 blob back to a string.
///
/// # Errors
///
/// Besides the [`decrypt`] failures, returns `CryptoError::Base64` for
/// malformed input and `CryptoError::Utf8` if the plaintext is not text.
pub fn decrypt_string(encoded: &str, key: &[u8]) -> CryptoResult<Zeroizing<String>> {
    let blob = from_base64(encoded)?;
    let plaintext = decrypt(&blob, key)?;
    Ok(Zeroizing::new(String::from_utf8(plaintext)?))
}

/// Standard base64 with padding.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Parse standard base64 with padding.
pub fn from_base64(encoded: &str) -> CryptoResult<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}
