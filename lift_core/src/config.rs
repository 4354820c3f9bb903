//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::{Equipment, Error, ExperienceLevel, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub equipment: EquipmentConfig,

    #[serde(default)]
    pub plan: PlanConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Equipment availability. An empty list leaves plans unrestricted.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct EquipmentConfig {
    #[serde(default)]
    pub available: Vec<Equipment>,
}

impl EquipmentConfig {
    /// Equipment filter for plan generation, `None` when unrestricted
    pub fn filter(&self) -> Option<&[Equipment]> {
        if self.available.is_empty() {
            None
        } else {
            Some(&self.available)
        }
    }
}

/// Defaults for plan generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u32,

    #[serde(default)]
    pub experience_level: ExperienceLevel,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            days_per_week: default_days_per_week(),
            experience_level: ExperienceLevel::default(),
        }
    }
}

/// Exercise catalog source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog replacing the built-in one
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("lift")
}

fn default_days_per_week() -> u32 {
    3
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("lift").join("config.toml")
    }

    /// Reject values that plan generation would refuse
    pub fn validate(&self) -> Result<()> {
        if self.plan.days_per_week == 0 {
            return Err(Error::Config("plan.days_per_week must be at least 1".into()));
        }
        Ok(())
    }

    /// Render as TOML, in the same layout `load_from` reads
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
