//! Constants used throughout envhub.
//!
//! Centralizes sizes of the AES-256-GCM construction and the names the CLI
//! reads from its environment.

/// AES-256 key size in bytes.
pub const KEY_SIZE: usize = 32;

/// GCM nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest valid ciphertext blob: nonce plus tag over an empty plaintext.
pub const MIN_CIPHERTEXT_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Version assigned to freshly generated and freshly imported keys.
pub const INITIAL_KEY_VERSION: u32 = 1;

/// Bytes of SHA-256 output shown as a key fingerprint.
pub const FINGERPRINT_BYTES: usize = 8;

/// Default bundle file name.
pub const BUNDLE_FILE: &str = "envhub.toml";

/// Environment variable holding the base64 master key.
pub const MASTER_KEY_ENV: &str = "ENVHUB_MASTER_KEY";

/// Environment variable holding the current master key's version.
pub const MASTER_KEY_VERSION_ENV: &str = "ENVHUB_MASTER_KEY_VERSION";

/// Environment variable holding the replacement master key during rotation.
pub const NEW_MASTER_KEY_ENV: &str = "ENVHUB_NEW_MASTER_KEY";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ENVHUB_LOG";
