//! `cgrid config` - create, show or locate the config file.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::GridConfig;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write an example config
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config
    Show,

    /// Print the config file location
    Path,
}

fn resolve_path(config_path: Option<PathBuf>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path),
        None => GridConfig::default_path(),
    }
}

impl ConfigCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(force, config_path).await,
            Some(ConfigSubcommands::Show) | None => Self::show(config_path).await,
            Some(ConfigSubcommands::Path) => Self::show_path(config_path),
        }
    }

    async fn init(force: bool, config_path: Option<PathBuf>) -> Result<()> {
        let config_path = resolve_path(config_path)?;

        if config_path.exists() && !force {
            println!("❌ Config already exists at: {}", config_path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        let config = GridConfig::init_example();
        config.save_to(&config_path).await?;

        println!("✅ Created config at: {}", config_path.display());
        println!("\n{}", "Example configuration:".bold());
        println!("{}", toml::to_string_pretty(&config)?);
        println!("\n{}", "Next steps:".yellow());
        println!("  1. Point backend.endpoint at your master-data lookup service");
        println!("  2. Run 'cgrid options product' to check the connection");

        Ok(())
    }

    async fn show(config_path: Option<PathBuf>) -> Result<()> {
        let config = GridConfig::load_with_optional(config_path.clone()).await?;
        let config_path = resolve_path(config_path)?;

        println!("{}", "Configuration".bold());
        println!("Location: {}\n", config_path.display());
        println!("{}", toml::to_string_pretty(&config)?);

        if config.backend.endpoint.is_empty() {
            println!("{}", "Tip:".yellow());
            println!("  Run 'cgrid config init' to create an example configuration");
        }

        Ok(())
    }

    fn show_path(config_path: Option<PathBuf>) -> Result<()> {
        let config_path = resolve_path(config_path)?;
        println!("{}", config_path.display());

        if !config_path.exists() {
            println!("\n{}", "Note: Config file does not exist yet".yellow());
            println!("  Run 'cgrid config init' to create it");
        }

        Ok(())
    }
}
