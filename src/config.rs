//! Planner configuration, read from `config.toml` in the data directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::DEFAULT_PROFILE_NAME;
use crate::storage::JsonFileStore;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PlannerConfig {
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// File name of the snapshot inside the data directory
    pub snapshot_file: String,
    /// Plan created when no snapshot exists yet
    pub starter_plan: StarterPlan,
    pub insights: InsightConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            snapshot_file: "profiles.json".to_string(),
            starter_plan: StarterPlan::default(),
            insights: InsightConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `config.toml` from the default data directory
    pub fn load_default() -> Result<Self, ConfigError> {
        match JsonFileStore::default_data_dir() {
            Ok(dir) => Self::load(&dir.join(CONFIG_FILE_NAME)),
            Err(e) => {
                log::warn!("{}, using default configuration", e);
                Ok(Self::default())
            }
        }
    }

    /// Where the snapshot lives, if a data directory can be resolved
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => JsonFileStore::default_data_dir().ok()?,
        };
        Some(dir.join(&self.snapshot_file))
    }
}

/// Name and subjects of the first plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct StarterPlan {
    pub name: String,
    pub subjects: Vec<String>,
}

impl Default for StarterPlan {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            subjects: Vec::new(),
        }
    }
}

/// Settings for the text-insight service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct InsightConfig {
    pub enabled: bool,
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Model used for study-session insights
    pub study_model: String,
    /// Model used for mock-exam analysis
    pub exam_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            study_model: "gemini-2.0-flash".to_string(),
            exam_model: "gemini-2.0-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl InsightConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
