//! Key configuration for the command-line surface.
//!
//! Master keys reach the CLI as base64 through flags or the environment
//! (`ENVHUB_MASTER_KEY`, `ENVHUB_NEW_MASTER_KEY`); clap does the reading and
//! this module turns the raw values into validated keys. The engine itself
//! never touches the environment.

use zeroize::Zeroizing;

use crate::core::constants::{MASTER_KEY_ENV, NEW_MASTER_KEY_ENV};
use crate::core::MasterKey;
use crate::error::{ConfigError, Result};

/// Raw master key material supplied to the CLI.
pub struct KeyConfig {
    master_key: Option<Zeroizing<String>>,
    master_key_version: u32,
    new_master_key: Option<Zeroizing<String>>,
}

impl KeyConfig {
    pub fn new(
        master_key: Option<String>,
        master_key_version: u32,
        new_master_key: Option<String>,
    ) -> Self {
        Self {
            master_key: master_key.map(Zeroizing::new),
            master_key_version,
            new_master_key: new_master_key.map(Zeroizing::new),
        }
    }

    /// The current master key.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingMasterKey` if unset, `ConfigError::InvalidMasterKey`
    /// if it is not base64 of 32 bytes or the version is 0.
    pub fn master_key(&self) -> Result<MasterKey> {
        resolve(
            self.master_key.as_deref(),
            self.master_key_version,
            MASTER_KEY_ENV,
            "master-key",
        )
    }

    /// The replacement master key, one version above the current one.
    pub fn new_master_key(&self) -> Result<MasterKey> {
        resolve(
            self.new_master_key.as_deref(),
            self.master_key_version.saturating_add(1),
            NEW_MASTER_KEY_ENV,
            "new-master-key",
        )
    }
}

fn resolve(
    encoded: Option<&String>,
    version: u32,
    var: &'static str,
    flag: &'static str,
) -> Result<MasterKey> {
    let encoded = encoded
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingMasterKey { var, flag })?;

    let key = MasterKey::from_base64(encoded)
        .map(|key| key.with_version(version))
        .map_err(|source| ConfigError::InvalidMasterKey { var, source })?;
    key.validate()
        .map_err(|source| ConfigError::InvalidMasterKey { var, source })?;

    Ok(key)
}
