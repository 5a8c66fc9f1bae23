//! envhub - Envelope encryption for project secrets.
//!
//! Each project's secrets are encrypted with AES-256-GCM under a per-project
//! data key. Data keys are in turn wrapped under a single master key, so
//! rotating the master key only rewraps data keys and never touches the
//! secrets themselves.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── core/             # Envelope engine (no I/O)
//! │   ├── cipher/       # AES-256-GCM and blob layout
//! │   ├── keys          # Master and data keys
//! │   ├── envelope      # Wrap/unwrap and secret encryption
//! │   └── rotation      # Batch rotation
//! ├── bundle/           # envhub.toml project bundles
//! ├── config            # Master key resolution
//! ├── cli/              # Command-line interface
//! └── error             # Error types
//! ```
//!
//! # Example
//!
//! ```
//! use envhub::core::{self, DataKey, MasterKey};
//!
//! let master = MasterKey::generate()?;
//! let dek = DataKey::generate()?;
//!
//! let wrapped = core::encrypt_dek(&dek, &master)?;
//! let secret = core::encrypt_with_dek(b"postgres://localhost/app", &dek)?;
//!
//! let dek = core::decrypt_dek(&wrapped, &master)?;
//! assert_eq!(core::decrypt_with_dek(&secret, &dek)?, b"postgres://localhost/app");
//! # Ok::<(), envhub::error::CryptoError>(())
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
