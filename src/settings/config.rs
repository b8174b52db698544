//! Settings types

use holocron_core::ProgressionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Records directory; `~/.holocron/records` when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_abilities_file")]
    pub abilities_file: PathBuf,
}

fn default_abilities_file() -> PathBuf {
    PathBuf::from("config/abilities.toml")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            abilities_file: default_abilities_file(),
        }
    }
}
