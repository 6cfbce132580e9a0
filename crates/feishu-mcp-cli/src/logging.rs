//! Logging initialization
//!
//! Logs always go to stderr; stdout carries command output only.
//! `RUST_LOG` wins over `--verbose`.

use std::io;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{CliError, CliResult};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "feishu_mcp=debug,feishu_mcp_cli=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global stderr subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init(verbose: bool) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
