//! User configuration for the `cgrid` tool.
//!
//! Stored at `~/.cgrid/config.toml` (`%LOCALAPPDATA%\cgrid\config.toml` on
//! Windows). `CGRID_CONFIG` or `--config` point somewhere else.
//!
//! ```toml
//! [backend]
//! endpoint = "http://localhost:8080/api/masterdata/lookup"
//! timeout_secs = 30
//!
//! [options]
//! page_limit = 50
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_PAGE_LIMIT};
use crate::core::GridError;

const fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Where master-data lookups are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// URL every lookup is POSTed to
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout; the HTTP client default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Page size of option lookups that don't ask for one
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

impl GridConfig {
    /// Load from the default location; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, else from the default location.
    ///
    /// A missing file yields defaults either way.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write as pretty TOML, creating parent directories.
    ///
    /// On Unix the file is made owner read/write only.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)
                .await
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    /// `CGRID_CONFIG` if set, otherwise the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("cgrid")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".cgrid")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// A config with every section filled in, for `cgrid config init`.
    #[must_use]
    pub fn init_example() -> Self {
        Self {
            backend: BackendConfig {
                endpoint: "http://localhost:8080/api/masterdata/lookup".to_string(),
                timeout_secs: Some(30),
            },
            options: OptionsConfig::default(),
        }
    }

    /// Check the settings a lookup needs.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.backend.endpoint.trim().is_empty() {
            return Err(GridError::ConfigError {
                message: "backend.endpoint is not set".to_string(),
            });
        }
        if self.options.page_limit == 0 {
            return Err(GridError::ConfigError {
                message: "options.page_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
