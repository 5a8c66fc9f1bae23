//! Envelope operations.
//!
//! Data keys are wrapped (encrypted) under the master key and stored as
//! base64; secrets are encrypted under the project's data key. Everything is
//! built on [`crate::core::cipher`].

use tracing::trace;
use zeroize::Zeroizing;

use crate::core::cipher;
use crate::core::constants::{INITIAL_KEY_VERSION, KEY_SIZE};
use crate::core::keys::{DataKey, MasterKey};
use crate::error::{CryptoError, CryptoResult};

/// Wrap a data key under the master key.
///
/// # Returns
///
/// Base64 blob suitable for storing as the project's wrapped data key.
///
/// # Errors
///
/// Returns the validation error of either key, or any cipher failure.
pub fn encrypt_dek(dek: &DataKey, master_key: &MasterKey) -> CryptoResult<String> {
    master_key.validate()?;
    dek.validate()?;

    let wrapped = cipher::encrypt(dek.as_bytes(), master_key.as_bytes())?;
    trace!(version = dek.version(), "wrapped data key");
    Ok(cipher::to_base64(&wrapped))
}

/// Unwrap a data key stored by [`encrypt_dek`].
///
/// The version is not part of the wrapped form, so the returned key is
/// always at version 1. Use [`decrypt_dek_with_version`] to restore a
/// version persisted next to the wrapped key.
///
/// # Errors
///
/// `CryptoError::Base64` for malformed input, `CryptoError::DecryptionFailed`
/// for a wrong master key or corrupted blob, and `CryptoError::InvalidKeySize`
/// if the recovered plaintext is not a 32-byte key.
pub fn decrypt_dek(wrapped: &str, master_key: &MasterKey) -> CryptoResult<DataKey> {
    master_key.validate()?;

    let blob = cipher::from_base64(wrapped)?;
    let key = Zeroizing::new(cipher::decrypt(&blob, master_key.as_bytes())?);

    if key.len() != KEY_SIZE {
        return Err(CryptoError::key_size(key.len()));
    }

    Ok(DataKey::new(key.to_vec(), INITIAL_KEY_VERSION))
}

/// Unwrap a data key and attach a known version.
///
/// # Errors
///
/// As [`decrypt_dek`], plus `CryptoError::InvalidDataKey` for version 0.
pub fn decrypt_dek_with_version(
    wrapped: &str,
    master_key: &MasterKey,
    version: u32,
) -> CryptoResult<DataKey> {
    let dek = decrypt_dek(wrapped, master_key)?.with_version(version);
    dek.validate()?;
    Ok(dek)
}

/// Encrypt secret bytes under a data key.
pub fn encrypt_with_dek(plaintext: &[u8], dek: &DataKey) -> CryptoResult<Vec<u8>> {
    dek.validate()?;
    cipher::encrypt(plaintext, dek.as_bytes())
}

/// Decrypt secret bytes under a data key.
pub fn decrypt_with_dek(ciphertext: &[u8], dek: &DataKey) -> CryptoResult<Vec<u8>> {
    dek.validate()?;
    cipher::decrypt(ciphertext, dek.as_bytes())
}

/// Encrypt a secret value under a data key, returning base64.
pub fn seal_secret(plaintext: &str, dek: &DataKey) -> CryptoResult<String> {
    dek.validate()?;
    cipher::encrypt_string(plaintext, dek.as_bytes())
}

/// Decrypt a base64 secret value under a data key.
pub fn open_secret(encoded: &str, dek: &DataKey) -> CryptoResult<Zeroizing<String>> {
    dek.validate()?;
    cipher::decrypt_string(encoded, dek.as_bytes())
}
