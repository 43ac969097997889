//! Momentum configuration.
//!
//! Config file: ~/.config/momentum/config.toml or /etc/momentum/config.toml.
//! `MOMENTUM_CONFIG` points at an explicit file and wins over both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::progression::LevelFloorPolicy;

/// Environment override for the config file location
pub const CONFIG_ENV: &str = "MOMENTUM_CONFIG";

/// Points granted per user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Awarded on completion, revoked on un-check
    #[serde(default = "default_habit_points")]
    pub habit: i64,

    #[serde(default = "default_journal_points")]
    pub journal: i64,
}

fn default_habit_points() -> i64 {
    10
}

fn default_journal_points() -> i64 {
    10
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            habit: default_habit_points(),
            journal: default_journal_points(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default)]
    pub level_floor: LevelFloorPolicy,

    /// XP events kept per user
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    500
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_floor: LevelFloorPolicy::default(),
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding user documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_id: Option<String>,
}

/// Main Momentum configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    #[serde(default)]
    pub points: PointsConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub user: UserConfig,
}

impl MomentumConfig {
    /// Default user config path: ~/.config/momentum/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("momentum").join("config.toml"))
    }

    /// System config path: /etc/momentum/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/momentum/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. `explicit` path (CLI flag)
    /// 2. `$MOMENTUM_CONFIG`
    /// 3. User config
    /// 4. System config
    /// 5. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            if !env_path.is_empty() {
                return Self::load_from(Path::new(&env_path));
            }
        }

        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: MomentumConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.points.habit <= 0 {
            anyhow::bail!("points.habit must be positive, got {}", self.points.habit);
        }
        if self.points.journal < 0 {
            anyhow::bail!("points.journal must not be negative, got {}", self.points.journal);
        }
        if self.progression.history_limit == 0 {
            anyhow::bail!("progression.history_limit must be at least 1");
        }
        Ok(())
    }

    /// Data directory: configured, else $XDG_DATA_HOME/momentum
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("momentum"))
            .unwrap_or_else(|| PathBuf::from(".momentum"))
    }
}
