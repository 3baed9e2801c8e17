//! Shared setup for commands that talk to the lookup backend

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::CliConfig;
use crate::config::GridConfig;
use crate::core::GridError;
use crate::grid::ConsignmentGrid;
use crate::lookup::HttpLookupService;

/// Loaded configuration plus the flags that override it.
#[derive(Debug)]
pub struct CommandContext {
    pub config: GridConfig,
    /// File the config came from, or would have come from
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Load the config and apply `--endpoint`.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read, or no endpoint is
    /// known afterwards
    pub async fn load(cli: &CliConfig) -> Result<Self> {
        // An explicit --config must exist; only the default location may be absent
        if let Some(path) = &cli.config_path {
            if !path.exists() && cli.endpoint.is_none() {
                return Err(GridError::ConfigNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
        }

        let mut config = GridConfig::load_with_optional(cli.config_path.clone()).await?;
        if let Some(endpoint) = &cli.endpoint {
            config.backend.endpoint.clone_from(endpoint);
        }
        config.validate().context("Invalid configuration; run 'cgrid config init' or pass --endpoint")?;

        Ok(Self {
            config,
            config_path: cli.config_path.clone(),
        })
    }

    pub fn lookup(&self) -> Result<HttpLookupService> {
        Ok(HttpLookupService::from_config(&self.config.backend)?)
    }

    pub fn grid(&self) -> Result<ConsignmentGrid> {
        let lookup = Arc::new(self.lookup()?);
        Ok(ConsignmentGrid::new(lookup, self.config.options.page_limit))
    }
}
