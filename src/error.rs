//! Error types for envhub.
//!
//! The engine in [`crate::core`] reports [`CryptoError`]. The command-line
//! surface wraps it in [`Error`] alongside configuration and bundle failures.

use std::fmt;

use thiserror::Error;

/// Flat classification of engine failures.
///
/// Obtained through [`CryptoError::kind`], which looks through any rotation
/// context wrapped around the underlying failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKeySize,
    InvalidCiphertext,
    InvalidNonce,
    EncryptionFailed,
    DecryptionFailed,
    InvalidMasterKey,
    InvalidDataKey,
    MalformedEncoding,
    EntropyUnavailable,
}

/// The step of a rotation batch at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStep {
    /// Validating the master key being rotated away from.
    OldMasterKey,
    /// Validating the replacement master key.
    NewMasterKey,
    /// Unwrapping a data key under the old master key.
    UnwrapDataKey { index: usize },
    /// Wrapping a recovered data key under the new master key.
    RewrapDataKey { index: usize },
    /// Unwrapping the data key being replaced.
    UnwrapOldDataKey,
    /// Drawing the replacement data key.
    GenerateDataKey,
    /// Wrapping the replacement data key.
    WrapNewDataKey,
    /// Decrypting a secret under the old data key.
    DecryptSecret { index: usize },
    /// Encrypting a secret under the new data key.
    EncryptSecret { index: usize },
}

impl RotationStep {
    /// Batch position of the failing item, if the step is per-item.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::UnwrapDataKey { index }
            | Self::RewrapDataKey { index }
            | Self::DecryptSecret { index }
            | Self::EncryptSecret { index } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OldMasterKey => write!(f, "invalid old master key"),
            Self::NewMasterKey => write!(f, "invalid new master key"),
            Self::UnwrapDataKey { index } => {
                write!(f, "failed to decrypt data key #{} during rotation", index)
            }
            Self::RewrapDataKey { index } => {
                write!(f, "failed to re-encrypt data key #{} during rotation", index)
            }
            Self::UnwrapOldDataKey => write!(f, "failed to decrypt old data key"),
            Self::GenerateDataKey => write!(f, "failed to generate new data key"),
            Self::WrapNewDataKey => write!(f, "failed to encrypt new data key"),
            Self::DecryptSecret { index } => write!(f, "failed to decrypt secret #{}", index),
            Self::EncryptSecret { index } => write!(f, "failed to re-encrypt secret #{}", index),
        }
    }
}

/// Engine errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key size: expected {expected} bytes, got {got}")]
    InvalidKeySize { expected: usize, got: usize },

    #[error("invalid ciphertext format: expected at least {min} bytes, got {got}")]
    InvalidCiphertext { min: usize, got: usize },

    #[error("invalid nonce size: expected {expected} bytes, got {got}")]
    InvalidNonce { expected: usize, got: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Tag verification failed. Corruption and wrong-key use are reported
    /// identically.
    #[error("decryption failed: authentication failed or corrupted data")]
    DecryptionFailed,

    #[error("invalid master key: {0}")]
    InvalidMasterKey(String),

    #[error("invalid data key: {0}")]
    InvalidDataKey(String),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("plaintext is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("random number generation failed: {0}")]
    Entropy(String),

    #[error("{step}: {source}")]
    Rotation {
        step: RotationStep,
        #[source]
        source: Box<CryptoError>,
    },
}

impl CryptoError {
    /// Flat kind of this error, ignoring rotation context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKeySize { .. } => ErrorKind::InvalidKeySize,
            Self::InvalidCiphertext { .. } => ErrorKind::InvalidCiphertext,
            Self::InvalidNonce { .. } => ErrorKind::InvalidNonce,
            Self::EncryptionFailed(_) => ErrorKind::EncryptionFailed,
            Self::DecryptionFailed => ErrorKind::DecryptionFailed,
            Self::InvalidMasterKey(_) => ErrorKind::InvalidMasterKey,
            Self::InvalidDataKey(_) => ErrorKind::InvalidDataKey,
            Self::Base64(_) | Self::Utf8(_) => ErrorKind::MalformedEncoding,
            Self::Entropy(_) => ErrorKind::EntropyUnavailable,
            Self::Rotation { source, .. } => source.kind(),
        }
    }

    /// Batch index of the item that failed, for per-item rotation failures.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Rotation { step, source } => step.index().or_else(|| source.index()),
            _ => None,
        }
    }

    /// Rotation step this error was raised in, if any.
    pub fn step(&self) -> Option<RotationStep> {
        match self {
            Self::Rotation { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Attach rotation context.
    pub(crate) fn during(self, step: RotationStep) -> Self {
        Self::Rotation {
            step,
            source: Box::new(self),
        }
    }

    pub(crate) fn key_size(got: usize) -> Self {
        Self::InvalidKeySize {
            expected: crate::core::constants::KEY_SIZE,
            got,
        }
    }
}

/// Configuration errors raised while resolving keys for the CLI.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("master key not set: export {var} or pass --{flag}")]
    MissingMasterKey {
        var: &'static str,
        flag: &'static str,
    },

    #[error("invalid {var}: {source}")]
    InvalidMasterKey {
        var: &'static str,
        #[source]
        source: CryptoError,
    },
}

/// Errors reading, writing, or editing a project bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("no bundle at {0}: run `envhub init` first")]
    NotFound(String),

    #[error("bundle already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("secret already exists: {0} (use --force to overwrite)")]
    SecretExists(String),

    #[error("invalid secret name '{key}': {reason}")]
    InvalidName { key: String, reason: String },

    #[error("secret value cannot be empty: {0}")]
    EmptyValue(String),

    #[error("failed to write {path}: {source} (already rewritten: {committed})")]
    PartialCommit {
        path: String,
        committed: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bundle: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize bundle: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level error for the command-line surface.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("confirmation required: pass --yes to run non-interactively")]
    ConfirmationRequired,

    #[error("aborted")]
    Aborted,
}

/// Result for engine operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Result for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;
