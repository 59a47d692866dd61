use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Named lifecycle constants.
///
/// These windows carry no documented clinical justification, so they are
/// configuration rather than hardcoded values. The last two are enforced
/// by the form-validation layer in front of this core; they are kept here
/// so every consumer reads one source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Days from creation until a prescription falls due.
    pub due_window_days: i64,
    /// Days a ready prescription may wait before an overdue alert.
    pub pickup_overdue_days: i64,
    /// Maximum age of a prescription accepted at intake.
    pub max_prescription_age_days: i64,
    /// Maximum days of supply for a controlled substance.
    pub controlled_supply_days: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        LifecycleConfig {
            due_window_days: 7,
            pickup_overdue_days: 3,
            max_prescription_age_days: 30,
            controlled_supply_days: 90,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::Parse(format!("Invalid config file: {}", e)))
}
