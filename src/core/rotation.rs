//! Key rotation.
//!
//! Two single-pass batch transformations:
//!
//! - **Master key rotation**: unwrap every data key under the old master key
//!   and rewrap it under the new one. Data key bytes and secrets are untouched.
//! - **Data key rotation**: replace a project's data key with a fresh one at
//!   `version + 1` and re-encrypt every secret under it.
//!
//! Both are all-or-nothing. Output position `i` always corresponds to input
//! position `i`, and the first failing item aborts the batch; no partial list
//! is ever returned. Items are processed sequentially in input order, so the
//! reported failure is always the lowest failing index. Nothing is persisted
//! here: callers commit the returned values to their store atomically.

use serde::Serialize;
use tracing::{debug, info, trace};
use zeroize::Zeroizing;

use crate::core::cipher;
use crate::core::constants::INITIAL_KEY_VERSION;
use crate::core::envelope::{
    decrypt_dek, decrypt_dek_with_version, decrypt_with_dek, encrypt_dek, encrypt_with_dek,
};
use crate::core::keys::{DataKey, MasterKey};
use crate::error::{CryptoError, CryptoResult, RotationStep};

/// Summary of a completed rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationReport {
    /// Version of the key rotated away from.
    pub old_version: u32,
    /// Version of the key now in use.
    pub new_version: u32,
    /// Number of wrapped items re-protected.
    pub items_rotated: usize,
}

/// Result of [`rotate_master_key_with_report`].
#[derive(Debug, Clone)]
pub struct MasterKeyRotation {
    /// Data keys wrapped under the new master key, in input order.
    pub wrapped_deks: Vec<String>,
    pub report: RotationReport,
}

/// Result of a data key rotation.
#[derive(Debug, Clone)]
pub struct DekRotation {
    /// The replacement data key.
    pub data_key: DataKey,
    /// The replacement data key wrapped under the master key.
    pub wrapped_dek: String,
    /// Secrets re-encrypted under the replacement key, in input order.
    pub secrets: Vec<String>,
    old_version: u32,
}

impl DekRotation {
    pub fn report(&self) -> RotationReport {
        RotationReport {
            old_version: self.old_version,
            new_version: self.data_key.version(),
            items_rotated: self.secrets.len(),
        }
    }
}

/// Rewrap every data key from `old_master_key` to `new_master_key`.
///
/// # Arguments
///
/// * `old_master_key` - Key the data keys are currently wrapped under
/// * `new_master_key` - Key to wrap them under
/// * `wrapped_deks` - Base64 wrapped data keys, in caller order
///
/// # Returns
///
/// The rewrapped data keys, `result[i]` corresponding to `wrapped_deks[i]`.
///
/// # Errors
///
/// Returns the first failure wrapped in `CryptoError::Rotation`, carrying
/// the failing step and batch index.
pub fn rotate_master_key<S: AsRef<str>>(
    old_master_key: &MasterKey,
    new_master_key: &MasterKey,
    wrapped_deks: &[S],
) -> CryptoResult<Vec<String>> {
    old_master_key
        .validate()
        .map_err(|e| e.during(RotationStep::OldMasterKey))?;
    new_master_key
        .validate()
        .map_err(|e| e.during(RotationStep::NewMasterKey))?;

    info!(
        count = wrapped_deks.len(),
        from = old_master_key.version(),
        to = new_master_key.version(),
        "rotating master key"
    );

    let rewrapped = wrapped_deks
        .iter()
        .enumerate()
        .map(|(index, wrapped)| {
            let dek = decrypt_dek(wrapped.as_ref(), old_master_key)
                .map_err(|e| e.during(RotationStep::UnwrapDataKey { index }))?;
            let rewrapped = encrypt_dek(&dek, new_master_key)
                .map_err(|e| e.during(RotationStep::RewrapDataKey { index }))?;
            trace!(index, "rewrapped data key");
            Ok(rewrapped)
        })
        .collect::<CryptoResult<Vec<_>>>()?;

    debug!(count = rewrapped.len(), "master key rotation complete");
    Ok(rewrapped)
}

/// [`rotate_master_key`] plus a [`RotationReport`].
pub fn rotate_master_key_with_report<S: AsRef<str>>(
    old_master_key: &MasterKey,
    new_master_key: &MasterKey,
    wrapped_deks: &[S],
) -> CryptoResult<MasterKeyRotation> {
    let wrapped_deks = rotate_master_key(old_master_key, new_master_key, wrapped_deks)?;
    let report = RotationReport {
        old_version: old_master_key.version(),
        new_version: new_master_key.version(),
        items_rotated: wrapped_deks.len(),
    };
    Ok(MasterKeyRotation {
        wrapped_deks,
        report,
    })
}

/// Replace a project's data key and re-encrypt its secrets.
///
/// The old wrapped key carries no version, so it is treated as version 1 and
/// the replacement is version 2. Use [`rotate_project_dek_from`] when the
/// current version is known.
pub fn rotate_project_dek<S: AsRef<str>>(
    old_wrapped_dek: &str,
    master_key: &MasterKey,
    wrapped_secrets: &[S],
) -> CryptoResult<DekRotation> {
    rotate_project_dek_from(
        old_wrapped_dek,
        INITIAL_KEY_VERSION,
        master_key,
        wrapped_secrets,
    )
}

/// Replace a project's data key, known to be at `old_version`, and
/// re-encrypt its secrets.
///
/// # Arguments
///
/// * `old_wrapped_dek` - Current data key, wrapped under `master_key`
/// * `old_version` - Version persisted alongside the wrapped key
/// * `master_key` - Key the old and new data keys are wrapped under
/// * `wrapped_secrets` - Base64 secrets encrypted under the old data key
///
/// # Returns
///
/// The new data key at `old_version + 1`, its wrapped form, and the
/// re-encrypted secrets in input order.
///
/// # Errors
///
/// Returns the first failure wrapped in `CryptoError::Rotation`. A version
/// that cannot be incremented fails with `CryptoError::InvalidDataKey`.
pub fn rotate_project_dek_from<S: AsRef<str>>(
    old_wrapped_dek: &str,
    old_version: u32,
    master_key: &MasterKey,
    wrapped_secrets: &[S],
) -> CryptoResult<DekRotation> {
    let old_dek = decrypt_dek_with_version(old_wrapped_dek, master_key, old_version)
        .map_err(|e| e.during(RotationStep::UnwrapOldDataKey))?;

    let new_version = old_version
        .checked_add(1)
        .ok_or_else(|| CryptoError::InvalidDataKey(format!("version {} overflows", old_version)))
        .map_err(|e| e.during(RotationStep::GenerateDataKey))?;
    let new_dek = DataKey::generate()
        .map_err(|e| e.during(RotationStep::GenerateDataKey))?
        .with_version(new_version);

    let wrapped_dek =
        encrypt_dek(&new_dek, master_key).map_err(|e| e.during(RotationStep::WrapNewDataKey))?;

    info!(
        count = wrapped_secrets.len(),
        from = old_version,
        to = new_version,
        "rotating data key"
    );

    let secrets = wrapped_secrets
        .iter()
        .enumerate()
        .map(|(index, secret)| {
            let plaintext = cipher::from_base64(secret.as_ref())
                .and_then(|blob| decrypt_with_dek(&blob, &old_dek))
                .map(Zeroizing::new)
                .map_err(|e| e.during(RotationStep::DecryptSecret { index }))?;
            let ciphertext = encrypt_with_dek(&plaintext, &new_dek)
                .map_err(|e| e.during(RotationStep::EncryptSecret { index }))?;
            trace!(index, "re-encrypted secret");
            Ok(cipher::to_base64(&ciphertext))
        })
        .collect::<CryptoResult<Vec<_>>>()?;

    debug!(count = secrets.len(), "data key rotation complete");
    Ok(DekRotation {
        data_key: new_dek,
        wrapped_dek,
        secrets,
        old_version,
    })
}
