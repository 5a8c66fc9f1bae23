//! Inspect command.
//!
//! Shows how a ciphertext blob splits into nonce, body and tag. Nothing is
//! decrypted and no key is needed.

use crate::cli::output;
use crate::core::cipher::{self, Blob, Cipher, Gcm};
use crate::error::Result;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Print the layout of a base64 blob.
pub fn execute(encoded: &str) -> Result<()> {
    let bytes = cipher::from_base64(encoded.trim())?;
    let blob = Blob::parse(&bytes)?;

    output::header(&format!("{} blob", Gcm.name()));
    output::rule();
    output::kv("total:    ", format!("{} bytes", bytes.len()));
    output::kv("nonce:    ", hex(blob.nonce()));
    output::kv("plaintext:", format!("{} bytes", blob.plaintext_len()));
    output::kv("tag:      ", hex(blob.tag()));
    Ok(())
}
