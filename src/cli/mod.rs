//! Command-line interface for `cgrid`.
//!
//! `cgrid` drives the dependent-field grid against a live master-data
//! backend:
//!
//! - `options` - fetch one dropdown list the way the grid would
//! - `replay` - load rows, replay a script of grid events, print the result
//! - `config` - create, show or locate the config file
//!
//! # Examples
//!
//! ```bash
//! cgrid config init
//! cgrid options uncode --driving P1 --search acid
//! cgrid replay session.json --rows rows.json --json
//! cgrid --verbose --endpoint http://localhost:8080/lookup options product
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//! - `--config` - path to a config file (also `CGRID_CONFIG`)
//! - `--endpoint` - lookup URL, overriding the config

mod common;
mod config;
mod options;
mod replay;

pub use common::CommandContext;
pub use replay::{ReplayEvent, ReplayReport, ReplayScript};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive for the log subscriber; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,

    pub config_path: Option<PathBuf>,

    pub endpoint: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    }

    /// Install the stderr log subscriber. A second call is a no-op.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "cgrid",
    about = "Resolve dependent Product / UN Code / DG Class fields for consignment actuals",
    version,
    long_about = "cgrid fetches master-data dropdown options and replays grid edits against a lookup backend, keeping UN Code, DG Class and the hazardous-goods flag consistent."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default ~/.cgrid/config.toml or $CGRID_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Lookup endpoint, overriding `backend.endpoint`
    #[arg(long, global = true)]
    endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the dropdown options of one field
    Options(options::OptionsCommand),

    /// Replay a script of grid events against the backend
    Replay(replay::ReplayCommand),

    /// Manage the config file
    Config(config::ConfigCommand),
}

impl Cli {
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("consignment_grid=debug,cgrid=debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Options(cmd) => cmd.execute(&config).await,
            Commands::Replay(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
