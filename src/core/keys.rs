//! Key model.
//!
//! Two tiers: a long-lived [`MasterKey`] that only ever wraps data keys, and
//! per-project [`DataKey`]s that encrypt the secrets themselves. Both are 32
//! random bytes plus a version (at least 1). Key bytes are wiped on drop.
//!
//! Constructors do not validate. Every envelope and rotation operation calls
//! `validate()` on each key it is handed.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::core::cipher;
use crate::core::constants::{FINGERPRINT_BYTES, INITIAL_KEY_VERSION, KEY_SIZE};
use crate::error::{CryptoError, CryptoResult};

/// Draw a fresh 256-bit key from the OS CSPRNG.
fn random_key() -> CryptoResult<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; KEY_SIZE]);
    getrandom::getrandom(key.as_mut_slice()).map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(key)
}

/// Decode base64 key material, requiring exactly 32 bytes.
fn decode_key(encoded: &str) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let decoded = Zeroizing::new(cipher::from_base64(encoded.trim())?);
    if decoded.len() != KEY_SIZE {
        return Err(CryptoError::key_size(decoded.len()));
    }
    Ok(decoded)
}

/// Hex of the first bytes of SHA-256 over the key.
fn fingerprint(key: &[u8]) -> String {
    Sha256::digest(key)[..FINGERPRINT_BYTES]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Root key-encryption key.
#[derive(Clone)]
pub struct MasterKey {
    key: Zeroizing<Vec<u8>>,
    version: u32,
}

impl MasterKey {
    /// Wrap caller-supplied bytes without checking them.
    pub fn new(key: Vec<u8>, version: u32) -> Self {
        Self {
            key: Zeroizing::new(key),
            version,
        }
    }

    /// Generate a new master key at version 1.
    ///
    /// Done once during setup; the result must be stored out of band.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Entropy` if the OS cannot supply randomness.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self {
            key: random_key()?,
            version: INITIAL_KEY_VERSION,
        })
    }

    /// Load a master key from base64, e.g. from a secret manager.
    ///
    /// The imported key is at version 1.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Base64` for malformed input and
    /// `CryptoError::InvalidKeySize` if it does not decode to 32 bytes.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        Ok(Self {
            key: decode_key(encoded)?,
            version: INITIAL_KEY_VERSION,
        })
    }

    /// Export the raw key as base64.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(cipher::to_base64(&self.key))
    }

    /// Attach a version, e.g. one recorded next to the stored key.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Short non-secret identifier for display.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.key)
    }

    /// Check key size and version.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidKeySize` if the key is not 32 bytes,
    /// `CryptoError::InvalidMasterKey` if the version is 0.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.key.len() != KEY_SIZE {
            return Err(CryptoError::key_size(self.key.len()));
        }
        if self.version < INITIAL_KEY_VERSION {
            return Err(CryptoError::InvalidMasterKey(format!(
                "version must be at least {}, got {}",
                INITIAL_KEY_VERSION, self.version
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("version", &self.version)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Per-project data-encryption key.
#[derive(Clone)]
pub struct DataKey {
    key: Zeroizing<Vec<u8>>,
    version: u32,
}

impl DataKey {
    /// Wrap caller-supplied bytes without checking them.
    pub fn new(key: Vec<u8>, version: u32) -> Self {
        Self {
            key: Zeroizing::new(key),
            version,
        }
    }

    /// Generate a new data key at version 1.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Entropy` if the OS cannot supply randomness.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self {
            key: random_key()?,
            version: INITIAL_KEY_VERSION,
        })
    }

    /// Load raw data key bytes from base64 at version 1.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        Ok(Self {
            key: decode_key(encoded)?,
            version: INITIAL_KEY_VERSION,
        })
    }

    /// Export the raw key as base64.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(cipher::to_base64(&self.key))
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.key)
    }

    /// Check key size and version.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidKeySize` if the key is not 32 bytes,
    /// `CryptoError::InvalidDataKey` if the version is 0.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.key.len() != KEY_SIZE {
            return Err(CryptoError::key_size(self.key.len()));
        }
        if self.version < INITIAL_KEY_VERSION {
            return Err(CryptoError::InvalidDataKey(format!(
                "version must be at least {}, got {}",
                INITIAL_KEY_VERSION, self.version
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("version", &self.version)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
