//! Per-tenant service configuration.
//!
//! Each tenant has a `tileinfoConfig.json` below the config root:
//!
//! ```text
//! <config_path>/<tenant>/tileinfoConfig.json
//! {"service": "tileinfo", "config": {"info_datasets": {"<tileset>": {...}}}}
//! ```
//!
//! The file is read on every request, so edits apply without a restart.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tileinfo_core::DatasetConfig;

/// File name of the tenant config below `<config_path>/<tenant>/`.
pub const CONFIG_FILE_NAME: &str = "tileinfoConfig.json";

/// The `config` section of a tenant's service config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileInfoConfig {
    /// Datasets by tileset key.
    #[serde(default)]
    pub info_datasets: HashMap<String, DatasetConfig>,
}

impl TileInfoConfig {
    /// Dataset configured for `tileset`, if any.
    #[must_use]
    pub fn dataset(&self, tileset: &str) -> Option<&DatasetConfig> {
        self.info_datasets.get(tileset)
    }
}

#[derive(Debug, Deserialize)]
struct ServiceConfigFile {
    #[serde(default)]
    config: TileInfoConfig,
}

/// Errors reading a tenant config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid tenant name '{0}'")]
    InvalidTenant(String),
    #[error("failed to read tenant config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tenant config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads tenant configs from a config root directory.
#[derive(Debug, Clone)]
pub struct TenantConfigLoader {
    config_path: PathBuf,
}

impl TenantConfigLoader {
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Location of `tenant`'s config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTenant`] for names that are empty or
    /// would leave the config root.
    pub fn path_for(&self, tenant: &str) -> Result<PathBuf, ConfigError> {
        let valid = !tenant.is_empty()
            && tenant != "."
            && tenant != ".."
            && !tenant.contains(['/', '\\']);
        if !valid {
            return Err(ConfigError::InvalidTenant(tenant.to_string()));
        }
        Ok(self.config_path.join(tenant).join(CONFIG_FILE_NAME))
    }

    /// Loads and parses `tenant`'s config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the tenant name is invalid or the file
    /// cannot be read or parsed.
    pub async fn load(&self, tenant: &str) -> Result<TileInfoConfig, ConfigError> {
        let path = self.path_for(tenant)?;
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let file: ServiceConfigFile =
            serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(file.config)
    }
}
