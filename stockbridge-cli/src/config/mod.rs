//! Configuration file for the stockbridge CLI.
//!
//! Settings are resolved from:
//! 1. Environment variables
//! 2. The `[settings]` table of `~/.stockbridge/config.toml`
//!
//! The other tables of the file map onto [`StockbridgeConfig`]. A missing
//! file means defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockbridge::config::{AgentConfig, ContractsConfig, ModelConfig, NetworksConfig, StockbridgeConfig};
use stockbridge::settings::{EnvSettings, LayeredSettings, MapSettings};
use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// On-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Agent identity.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Networks and roles.
    #[serde(default)]
    pub networks: NetworksConfig,

    /// Contract deployments.
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Model overrides.
    #[serde(default)]
    pub model: ModelConfig,

    /// Fallback values for settings keys such as `EVM_PROVIDER_SEPOLIA`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

impl CliConfig {
    /// The library configuration.
    #[must_use]
    pub fn pipeline(&self) -> StockbridgeConfig {
        StockbridgeConfig {
            agent: self.agent.clone(),
            networks: self.networks.clone(),
            contracts: self.contracts.clone(),
            model: self.model.clone(),
        }
    }

    /// Environment first, then the file's `[settings]` table.
    #[must_use]
    pub fn settings(&self) -> LayeredSettings {
        let file: MapSettings = self
            .settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        LayeredSettings::new().layer(EnvSettings).layer(file)
    }
}

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stockbridge")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from `path`, or defaults if it does not exist.
pub async fn load_config_from(path: &Path) -> ConfigResult<CliConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(CliConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: CliConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to `path`, creating parent directories.
pub async fn save_config_to(config: &CliConfig, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Write a default config to `path`.
pub async fn init_config(path: &Path) -> ConfigResult<CliConfig> {
    let config = CliConfig::default();
    save_config_to(&config, path).await?;
    Ok(config)
}
