//! Keygen command.
//!
//! Generates a master key and prints it once. envhub never stores it.

use crate::cli::output;
use crate::core::constants::MASTER_KEY_ENV;
use crate::core::MasterKey;
use crate::error::Result;

/// Generate and print a new master key.
pub fn execute(json: bool) -> Result<()> {
    let key = MasterKey::generate()?;
    let encoded = key.to_base64();

    if json {
        let output = serde_json::json!({
            "key": encoded.as_str(),
            "version": key.version(),
            "fingerprint": key.fingerprint(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", encoded.as_str());
    output::section("Master key");
    output::kv("version:    ", key.version());
    output::kv("fingerprint:", key.fingerprint());
    output::hint(&format!("store it in a secret manager and export {}", MASTER_KEY_ENV));
    Ok(())
}
