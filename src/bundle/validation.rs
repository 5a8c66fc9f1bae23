//! Input validation for bundle edits.

use crate::error::{BundleError, Result};

/// Validate a secret name.
///
/// Secret names must be valid environment variable names:
/// - Only A-Z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `BundleError::InvalidName` if the name is invalid.
pub fn validate_name(key: &str) -> Result<()> {
    let invalid = |reason: String| -> Result<()> {
        Err(BundleError::InvalidName {
            key: key.to_string(),
            reason,
        }
        .into())
    };

    match key.chars().next() {
        None => return invalid("cannot be empty".to_string()),
        Some(first) if first.is_ascii_digit() => {
            return invalid("cannot start with a digit".to_string())
        }
        Some(_) => {}
    }

    if let Some((i, ch)) = key
        .chars()
        .enumerate()
        .find(|(_, ch)| !(ch.is_ascii_uppercase() || ch.is_ascii_digit() || *ch == '_'))
    {
        return invalid(format!(
            "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
            ch,
            i + 1
        ));
    }

    Ok(())
}

/// Validate a secret value.
///
/// # Errors
///
/// Returns `BundleError::EmptyValue` if the value is empty.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BundleError::EmptyValue(key.to_string()).into());
    }
    Ok(())
}
