//! Envelope encryption engine.
//!
//! Pure functions over caller-owned buffers and keys: no I/O, no global
//! state, nothing retained between calls. Safe to call concurrently.
//!
//! Layers, leaf first:
//!
//! - [`cipher`]: AES-256-GCM over raw bytes
//! - [`keys`]: master and data key types with validation
//! - [`envelope`]: wrap data keys under the master key, secrets under data keys
//! - [`rotation`]: batch rewrap and re-encrypt

pub mod cipher;
pub mod constants;
pub mod envelope;
pub mod keys;
pub mod rotation;

pub use envelope::{
    decrypt_dek, decrypt_dek_with_version, decrypt_with_dek, encrypt_dek, encrypt_with_dek,
    open_secret, seal_secret,
};
pub use keys::{DataKey, MasterKey};
pub use rotation::{
    rotate_master_key, rotate_master_key_with_report, rotate_project_dek,
    rotate_project_dek_from, DekRotation, MasterKeyRotation, RotationReport,
};
