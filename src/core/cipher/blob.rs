//! Ciphertext blob layout.
//!
//! ```text
//! [nonce: 12 bytes][ciphertext: len(plaintext) bytes][tag: 16 bytes]
//! ```

use crate::core::constants::{MIN_CIPHERTEXT_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};

/// Borrowed view over a ciphertext blob.
#[derive(Debug, Clone, Copy)]
pub struct Blob<'a> {
    nonce: &'a [u8; NONCE_SIZE],
    sealed: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Split a blob into nonce and sealed data.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidCiphertext` if the blob is shorter than
    /// nonce plus tag.
    pub fn parse(bytes: &'a [u8]) -> CryptoResult<Self> {
        if bytes.len() < MIN_CIPHERTEXT_SIZE {
            return Err(CryptoError::InvalidCiphertext {
                min: MIN_CIPHERTEXT_SIZE,
                got: bytes.len(),
            });
        }

        let (nonce, sealed) = bytes.split_at(NONCE_SIZE);
        let nonce = nonce.try_into().map_err(|_| CryptoError::InvalidNonce {
            expected: NONCE_SIZE,
            got: nonce.len(),
        })?;

        Ok(Self { nonce, sealed })
    }

    /// The 96-bit nonce.
    pub fn nonce(&self) -> &'a [u8; NONCE_SIZE] {
        self.nonce
    }

    /// AEAD output: ciphertext followed by the tag.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }

    /// Ciphertext without the tag.
    pub fn body(&self) -> &'a [u8] {
        &self.sealed[..self.plaintext_len()]
    }

    /// The 128-bit authentication tag.
    pub fn tag(&self) -> &'a [u8] {
        &self.sealed[self.plaintext_len()..]
    }

    /// Length of the plaintext this blob decrypts to.
    pub fn plaintext_len(&self) -> usize {
        self.sealed.len() - TAG_SIZE
    }
}
