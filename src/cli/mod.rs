//! Command-line interface.

pub mod completions;
pub mod init;
pub mod inspect;
pub mod keygen;
pub mod output;
pub mod rotate;
pub mod secrets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::KeyConfig;
use crate::core::constants::{
    BUNDLE_FILE, MASTER_KEY_ENV, MASTER_KEY_VERSION_ENV, NEW_MASTER_KEY_ENV,
};

/// envhub - Envelope encryption for project secrets.
#[derive(Parser)]
#[command(
    name = "envhub",
    about = "Envelope encryption for project secrets",
    version,
    after_help = "Master keys are read from ENVHUB_MASTER_KEY and ENVHUB_NEW_MASTER_KEY."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project bundle file
    #[arg(long, global = true, default_value = BUNDLE_FILE)]
    pub file: PathBuf,

    /// Master key (base64)
    #[arg(long, global = true, env = MASTER_KEY_ENV, hide_env_values = true)]
    pub master_key: Option<String>,

    /// Version of the current master key
    #[arg(long, global = true, env = MASTER_KEY_VERSION_ENV, default_value_t = 1)]
    pub master_key_version: u32,

    /// Replacement master key for rotate-master (base64)
    #[arg(long, global = true, env = NEW_MASTER_KEY_ENV, hide_env_values = true)]
    pub new_master_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a new master key
    Keygen {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a bundle for a new project
    Init {
        /// Project name
        name: String,
        /// Overwrite an existing bundle
        #[arg(long)]
        force: bool,
    },

    /// Set a secret value
    Set {
        /// Secret key (e.g., DATABASE_URL)
        key: String,
        /// Secret value
        value: String,
        /// Overwrite if exists
        #[arg(short, long)]
        force: bool,
    },

    /// Get a secret value
    Get {
        /// Secret key
        key: String,
    },

    /// Remove a secret
    Rm {
        /// Secret key
        key: String,
    },

    /// List all secret keys
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the project's data key and re-encrypt all secrets
    RotateDek,

    /// Rewrap the data keys of several bundles under a new master key
    RotateMaster {
        /// Bundle files to rotate
        #[arg(required = true)]
        bundles: Vec<PathBuf>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the layout of a base64 ciphertext blob
    Inspect {
        /// Base64 blob
        blob: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    use Command::*;

    let keys = KeyConfig::new(cli.master_key, cli.master_key_version, cli.new_master_key);
    let file = cli.file.as_path();

    match cli.command {
        Keygen { json } => keygen::execute(json),
        Init { name, force } => init::execute(file, &name, force, &keys),
        Set { key, value, force } => secrets::set(file, &key, &value, force, &keys),
        Get { key } => secrets::get(file, &key, &keys),
        Rm { key } => secrets::rm(file, &key),
        List { json } => secrets::list(file, json),
        RotateDek => rotate::rotate_dek(file, &keys),
        RotateMaster { bundles, yes } => rotate::rotate_master(&bundles, yes, &keys),
        Inspect { blob } => inspect::execute(&blob),
        Completions { shell } => completions::execute(shell),
    }
}
