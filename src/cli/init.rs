//! Init command.

use std::path::Path;

use tracing::info;

use crate::bundle::Bundle;
use crate::cli::output;
use crate::config::KeyConfig;
use crate::error::{BundleError, Result};

/// Create a bundle with a fresh data key wrapped under the master key.
pub fn execute(file: &Path, name: &str, force: bool, keys: &KeyConfig) -> Result<()> {
    if file.exists() && !force {
        return Err(BundleError::AlreadyExists(file.display().to_string()).into());
    }

    let master_key = keys.master_key()?;
    let bundle = Bundle::create(name, &master_key)?;
    bundle.save(file)?;

    info!(project = name, path = %file.display(), "initialized bundle");
    output::success(&format!(
        "initialized {} in {}",
        output::key(name),
        output::path(&file.display().to_string())
    ));
    Ok(())
}
