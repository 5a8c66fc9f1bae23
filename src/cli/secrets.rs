//! Secret management commands (set, get, rm, list).

use std::path::Path;

use crate::bundle::Bundle;
use crate::cli::output;
use crate::config::KeyConfig;
use crate::error::Result;

/// Set a secret value.
pub fn set(file: &Path, key: &str, value: &str, force: bool, keys: &KeyConfig) -> Result<()> {
    let mut bundle = Bundle::load(file)?;
    let master_key = keys.master_key()?;
    bundle.set(key, value, force, &master_key)?;
    bundle.save(file)?;
    output::success(&format!("set {}", output::key(key)));
    Ok(())
}

/// Get a secret value.
pub fn get(file: &Path, key: &str, keys: &KeyConfig) -> Result<()> {
    let bundle = Bundle::load(file)?;
    let master_key = keys.master_key()?;
    let value = bundle.get(key, &master_key)?;
    println!("{}", value.as_str());
    Ok(())
}

/// Remove a secret.
pub fn rm(file: &Path, key: &str) -> Result<()> {
    let mut bundle = Bundle::load(file)?;
    bundle.remove(key)?;
    bundle.save(file)?;
    output::success(&format!("removed {}", output::key(key)));
    Ok(())
}

/// List all secret keys.
pub fn list(file: &Path, json: bool) -> Result<()> {
    let bundle = Bundle::load(file)?;
    let keys: Vec<&str> = bundle.secrets.keys().map(String::as_str).collect();

    if json {
        let output = serde_json::json!({
            "project": bundle.project.name,
            "dek_version": bundle.project.dek_version,
            "keys": keys,
            "count": keys.len()
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if keys.is_empty() {
        output::dimmed("no secrets stored");
    } else {
        output::header(&format!("{} secrets:", keys.len()));
        for key in keys {
            output::list_item(key);
        }
    }

    Ok(())
}
