//! Command-line interface for Rafters.
//!
//! # Commands
//!
//! - `init` - Initialize Rafters in a React project
//! - `add` - Install a component from the registry
//! - `list` - Show available and installed components
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--registry <URL>` - Registry base URL (also `RAFTERS_REGISTRY_URL`)
//!
//! # Exit Codes
//!
//! `0` on success, `1` on any fatal error. Errors are printed by `main` with a
//! suggestion where one applies.
//!
//! # Examples
//!
//! ```bash
//! rafters init
//! rafters list --details
//! rafters add button
//! RAFTERS_REGISTRY_URL=http://localhost:4321/registry rafters add dialog --force
//! ```

mod add;
pub mod common;
mod init;
mod list;
pub mod prompt;

pub use add::{AddReport, AddStage, run_add};
pub use common::RunContext;
pub use init::{InitReport, run_init};
pub use list::{ListEntry, ListReport, render as render_list, run_list};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::constants::REGISTRY_URL_ENV;

/// Settings derived from global flags, applied before a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,
    pub registry_override: Option<String>,
}

/// Rafters component CLI.
#[derive(Parser, Debug)]
#[command(
    name = "rafters",
    about = "Install design-intelligent React components into your project",
    version,
    long_about = "Rafters copies components from a registry into your source tree, \
                  adapting imports to your project layout and recording each install \
                  with its design-intelligence metadata in .rafters/component-manifest.json."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Registry base URL
    #[arg(long, global = true, env = REGISTRY_URL_ENV, value_name = "URL")]
    registry: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize Rafters in the current project
    Init(init::InitCommand),

    /// Install a component from the registry
    Add(add::AddCommand),

    /// List available components
    List(list::ListCommand),
}

impl Cli {
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("rafters_cli=debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            registry_override: self.registry.clone(),
        }
    }

    /// Run the selected command in the current directory.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        let ctx = RunContext::from_process(config.registry_override)?;
        self.execute_with_context(&ctx).await
    }

    pub async fn execute_with_context(self, ctx: &RunContext) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute(ctx).await,
            Commands::Add(cmd) => cmd.execute(ctx).await,
            Commands::List(cmd) => cmd.execute(ctx).await,
        }
    }
}
