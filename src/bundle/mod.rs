//! Project bundle files.
//!
//! A bundle is the caller-side store for one project: its wrapped data key,
//! the key's version, and its secrets encrypted under that key. It never
//! holds a master key or any plaintext.
//!
//! ```toml
//! [project]
//! name = "api"
//! dek = "<base64>"
//! dek_version = 1
//!
//! [secrets]
//! DATABASE_URL = "<base64>"
//! ```

pub mod validation;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::INITIAL_KEY_VERSION;
use crate::core::{self, DataKey, MasterKey, RotationReport};
use crate::error::{BundleError, CryptoError, Result};

pub use validation::{validate_name, validate_value};

/// On-disk project bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub project: Project,
    /// Secret name to base64 ciphertext under the project's data key.
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

/// Project metadata and wrapped data key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Data key wrapped under the master key (base64).
    pub dek: String,
    pub dek_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_at: Option<DateTime<Utc>>,
}

/// A bundle written to a temporary file, not yet moved into place.
#[must_use = "staged bundles must be committed"]
pub struct Staged {
    tmp: PathBuf,
    path: PathBuf,
}

impl Staged {
    /// Atomically replace the target file.
    pub fn commit(self) -> Result<()> {
        self.rename()?;
        Ok(())
    }

    /// Remove the temporary file.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp);
    }

    fn rename(&self) -> std::io::Result<()> {
        fs::rename(&self.tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&self.tmp);
            e
        })
    }
}

/// Move staged bundles into place in order.
///
/// On the first failure the remaining temp files are removed and the error
/// names every bundle that was already replaced.
///
/// # Errors
///
/// Returns `BundleError::PartialCommit` if any rename fails.
pub fn commit_all(staged: Vec<Staged>) -> Result<()> {
    let mut committed: Vec<String> = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();

    while let Some(next) = pending.next() {
        if let Err(source) = next.rename() {
            pending.for_each(Staged::discard);
            return Err(BundleError::PartialCommit {
                path: next.path.display().to_string(),
                committed: if committed.is_empty() {
                    "none".to_string()
                } else {
                    committed.join(", ")
                },
                source,
            }
            .into());
        }
        committed.push(next.path.display().to_string());
    }
    Ok(())
}

impl Bundle {
    /// Create a bundle for a new project with a freshly generated data key.
    pub fn create(name: &str, master_key: &MasterKey) -> Result<Self> {
        let dek = DataKey::generate()?;
        let wrapped = core::encrypt_dek(&dek, master_key)?;
        debug!(project = name, fingerprint = %dek.fingerprint(), "created data key");

        Ok(Self {
            project: Project {
                name: name.to_string(),
                dek: wrapped,
                dek_version: dek.version(),
                rotated_at: None,
            },
            secrets: BTreeMap::new(),
        })
    }

    /// Load and validate a bundle.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::NotFound` if the file doesn't exist, or
    /// `BundleError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading bundle");

        if !path.exists() {
            return Err(BundleError::NotFound(path.display().to_string()).into());
        }
        let contents = fs::read_to_string(path)?;
        let bundle: Self = toml::from_str(&contents).map_err(BundleError::Parse)?;

        debug!(
            project = %bundle.project.name,
            secrets = bundle.secrets.len(),
            dek_version = bundle.project.dek_version,
            "bundle loaded"
        );

        bundle.validate()?;
        Ok(bundle)
    }

    /// Write the bundle next to `path` without replacing it yet.
    pub fn stage(&self, path: &Path) -> Result<Staged> {
        let contents = toml::to_string_pretty(self).map_err(BundleError::Serialize)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, contents)?;

        Ok(Staged {
            tmp,
            path: path.to_path_buf(),
        })
    }

    /// Write the bundle to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving bundle");
        self.stage(path)?.commit()
    }

    /// Check secret names and the stored data key version.
    pub fn validate(&self) -> Result<()> {
        if self.project.dek_version < INITIAL_KEY_VERSION {
            return Err(CryptoError::InvalidDataKey(format!(
                "bundle dek_version must be at least {}, got {}",
                INITIAL_KEY_VERSION, self.project.dek_version
            ))
            .into());
        }
        for name in self.secrets.keys() {
            validate_name(name)?;
        }
        Ok(())
    }

    /// Unwrap the project's data key at its stored version.
    pub fn data_key(&self, master_key: &MasterKey) -> Result<DataKey> {
        Ok(core::decrypt_dek_with_version(
            &self.project.dek,
            master_key,
            self.project.dek_version,
        )?)
    }

    /// Encrypt and store a secret.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or empty value, and
    /// `BundleError::SecretExists` if the name is taken and `force` is false.
    pub fn set(&mut self, key: &str, value: &str, force: bool, master_key: &MasterKey) -> Result<()> {
        validate_name(key)?;
        validate_value(key, value)?;

        if self.secrets.contains_key(key) && !force {
            return Err(BundleError::SecretExists(key.to_string()).into());
        }

        let dek = self.data_key(master_key)?;
        let sealed = core::seal_secret(value, &dek)?;
        self.secrets.insert(key.to_string(), sealed);
        Ok(())
    }

    /// Decrypt a secret.
    pub fn get(&self, key: &str, master_key: &MasterKey) -> Result<Zeroizing<String>> {
        let sealed = self
            .secrets
            .get(key)
            .ok_or_else(|| BundleError::SecretNotFound(key.to_string()))?;

        let dek = self.data_key(master_key)?;
        Ok(core::open_secret(sealed, &dek)?)
    }

    /// Remove a secret.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.secrets
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BundleError::SecretNotFound(key.to_string()).into())
    }

    /// Replace the data key and re-encrypt every secret under it.
    ///
    /// The bundle is only modified if the whole rotation succeeds.
    pub fn rotate_dek(&mut self, master_key: &MasterKey) -> Result<RotationReport> {
        let (names, sealed): (Vec<&String>, Vec<&String>) = self.secrets.iter().unzip();

        let rotation = core::rotate_project_dek_from(
            &self.project.dek,
            self.project.dek_version,
            master_key,
            &sealed,
        )?;
        let report = rotation.report();

        let secrets = names
            .into_iter()
            .cloned()
            .zip(rotation.secrets)
            .collect::<BTreeMap<_, _>>();

        self.secrets = secrets;
        self.project.dek = rotation.wrapped_dek;
        self.project.dek_version = rotation.data_key.version();
        self.project.rotated_at = Some(Utc::now());
        Ok(report)
    }

    /// Replace the wrapped data key after a master key rotation.
    pub fn rewrap(&mut self, wrapped_dek: String) {
        self.project.dek = wrapped_dek;
        self.project.rotated_at = Some(Utc::now());
    }
}
