//! Key rotation commands.
//!
//! `rotate-dek` replaces one project's data key and re-encrypts its secrets.
//! `rotate-master` rewraps the data keys of several bundles under a new
//! master key. Both write nothing unless the whole rotation succeeds.

use std::collections::HashSet;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use dialoguer::Confirm;
use tracing::{debug, info, warn};

use crate::bundle::{self, Bundle, Staged};
use crate::cli::output;
use crate::config::KeyConfig;
use crate::core;
use crate::error::{Error, Result};

/// Rotate the data key of the bundle at `file`.
pub fn rotate_dek(file: &Path, keys: &KeyConfig) -> Result<()> {
    let mut bundle = Bundle::load(file)?;
    let master_key = keys.master_key()?;

    let report = bundle.rotate_dek(&master_key)?;
    bundle.save(file)?;

    info!(
        project = %bundle.project.name,
        from = report.old_version,
        to = report.new_version,
        secrets = report.items_rotated,
        "data key rotated"
    );
    output::success(&format!(
        "rotated data key v{} → v{} ({} secrets re-encrypted)",
        report.old_version, report.new_version, report.items_rotated
    ));
    Ok(())
}

/// Ask before touching several files, unless `yes` was passed.
fn confirm(bundles: &[PathBuf], yes: bool) -> Result<()> {
    if yes {
        return Ok(());
    }
    if !io::stdin().is_terminal() {
        return Err(Error::ConfirmationRequired);
    }

    println!("The following bundles will be rewrapped:");
    for path in bundles {
        output::list_item(&output::path(&path.display().to_string()));
    }
    println!();

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Rotate the master key for {} bundle{}?",
            bundles.len(),
            if bundles.len() == 1 { "" } else { "s" }
        ))
        .default(false)
        .interact()?;

    if proceed {
        Ok(())
    } else {
        Err(Error::Aborted)
    }
}

/// Write every bundle to a temp file, discarding all of them on failure.
fn stage_all(bundles: &[(PathBuf, Bundle)]) -> Result<Vec<Staged>> {
    let mut staged = Vec::with_capacity(bundles.len());
    for (path, bundle) in bundles {
        match bundle.stage(path) {
            Ok(s) => staged.push(s),
            Err(e) => {
                staged.into_iter().for_each(Staged::discard);
                return Err(e);
            }
        }
    }
    Ok(staged)
}

/// Drop repeated bundle paths, comparing canonical forms, keeping first order.
///
/// Paths that cannot be resolved are kept as given so that loading reports
/// them.
fn unique_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|path| {
            let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            let fresh = seen.insert(canonical);
            if !fresh {
                debug!(path = %path.display(), "skipping repeated bundle");
            }
            fresh
        })
        .cloned()
        .collect()
}

/// Rewrap the data keys of `paths` from the current to the new master key.
pub fn rotate_master(paths: &[PathBuf], yes: bool, keys: &KeyConfig) -> Result<()> {
    let old_master_key = keys.master_key()?;
    let new_master_key = keys.new_master_key()?;

    let paths = unique_paths(paths);
    let mut bundles = paths
        .iter()
        .map(|path| Bundle::load(path).map(|bundle| (path.clone(), bundle)))
        .collect::<Result<Vec<_>>>()?;

    confirm(&paths, yes)?;

    let wrapped: Vec<&str> = bundles
        .iter()
        .map(|(_, bundle)| bundle.project.dek.as_str())
        .collect();

    let rotation = core::rotate_master_key_with_report(&old_master_key, &new_master_key, &wrapped)
        .map_err(|e| {
            if let Some(path) = e.index().and_then(|i| paths.get(i)) {
                warn!(path = %path.display(), "rotation failed");
                output::warn(&format!(
                    "failed at {}; no bundle was modified",
                    output::path(&path.display().to_string())
                ));
            }
            e
        })?;

    for ((_, bundle), dek) in bundles.iter_mut().zip(rotation.wrapped_deks) {
        bundle.rewrap(dek);
    }

    bundle::commit_all(stage_all(&bundles)?)?;

    let report = rotation.report;
    info!(
        from = report.old_version,
        to = report.new_version,
        bundles = report.items_rotated,
        "master key rotated"
    );
    output::success(&format!(
        "rewrapped {} data key{} under master key v{}",
        report.items_rotated,
        if report.items_rotated == 1 { "" } else { "s" },
        report.new_version
    ));
    output::hint(&format!(
        "export the new key as ENVHUB_MASTER_KEY with ENVHUB_MASTER_KEY_VERSION={}",
        report.new_version
    ));
    Ok(())
}
