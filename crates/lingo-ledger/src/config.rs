//! Configuration for the ledger and its command-line front end.
//!
//! Loads settings from `$LINGO_CONFIG` or `<config dir>/lingo/config.toml`,
//! falling back to defaults when the file is missing or invalid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::history::HISTORY_LIMIT;

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "LINGO_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerConfig {
    /// Directory holding one file per storage key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum history entries kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Write example history entries on first access
    #[serde(default = "default_seed_history")]
    pub seed_history: bool,

    /// Default tracing filter when `LINGO_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lingo")
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

fn default_seed_history() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
            seed_history: default_seed_history(),
            log_level: default_log_level(),
        }
    }
}

impl LedgerConfig {
    /// Config file path: `$LINGO_CONFIG`, else the user config dir
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingo")
            .join("config.toml")
    }

    /// Load config from file, or return defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from_path(&path).unwrap_or_else(|e| {
            warn!("Config not loaded from {}, using defaults: {}", path.display(), e);
            LedgerConfig::default()
        })
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, LedgerError> {
        let config = Self::read_from_path(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config file without logging, for callers that read config
    /// before logging is set up and report the outcome afterwards
    pub fn read_from_path(path: &Path) -> Result<Self, LedgerError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
