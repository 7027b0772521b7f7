//! Rafters CLI entry point.
//!
//! Parses arguments, sets up logging on stderr and runs the selected command.
//! Any error is converted once, here, into a user-facing message with a
//! suggestion, and the process exits with status 1.

use anyhow::Result;
use clap::Parser;
use rafters_cli::cli::Cli;
use rafters_cli::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.build_config().log_level.as_deref());

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

/// `--verbose`/`--quiet` win over `RUST_LOG`; the default shows warnings.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
