//! Configuration management for shelf

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::pager::DEFAULT_ITEMS_PER_PAGE;

/// Default dataset location when no config says otherwise
pub const DEFAULT_DATASET_PATH: &str = "~/.local/share/shelf/books_dataset_cleaned.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATASET_PATH.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file at the default location gives the default
    /// configuration. A file named through `SHELF_CONFIG` must exist.
    /// `SHELF_DATA` overrides the dataset path either way.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("SHELF_CONFIG").is_ok();
        let config_path = resolve_config_path()?;

        let mut config = if explicit || config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default_config()
        };

        if let Ok(path) = std::env::var("SHELF_DATA") {
            config.data.path = path;
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)
            .map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            data: DataConfig::default(),
            display: DisplayConfig::default(),
        }
    }

    /// Dataset path with `~` expanded
    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data.path).to_string())
    }

    fn validate(&self) -> Result<()> {
        if self.data.path.trim().is_empty() {
            return Err(ConfigError::MissingField("data.path".to_string()).into());
        }
        if self.display.items_per_page == 0 {
            return Err(ConfigError::Invalid("display.items_per_page must be at least 1".to_string()).into());
        }
        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SHELF_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("shelf").join("config.toml"))
}
