//! Command Line Interface module
//!
//! Argument parsing, per-invocation wiring and the command implementations.

pub mod args;
pub mod commands;
pub mod progress;
pub mod session;

pub use args::*;

use anyhow::Result;
use std::process::ExitCode;

use crate::utils::logging::{LogFormat, init_cli_logging};

/// Main CLI application runner
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    init_cli_logging(cli.verbose, cli.quiet, cli.log_file.as_deref(), format)?;
    log::debug!("{} v{}", crate::APP_NAME, crate::VERSION);

    let session = session::Session::from_cli(&cli)?;
    commands::execute_command(cli.command, &session).await
}
