//! envhub - Envelope encryption for project secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envhub::cli::output;
use envhub::cli::{execute, Cli};
use envhub::core::constants::LOG_ENV;
use envhub::error::{BundleError, ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envhub=debug")
        } else {
            EnvFilter::new("envhub=warn")
        }
    });

    let json = cli.log_json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let plain = (!cli.log_json).then(|| {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingMasterKey { .. }) => Some("run: envhub keygen"),
            Error::Bundle(BundleError::NotFound(_)) => Some("run: envhub init <name>"),
            Error::ConfirmationRequired => Some("rerun with --yes"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
