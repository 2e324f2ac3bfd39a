//! Error types for the progress ledger.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl LedgerError {
    /// Short machine-readable kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Storage(_) => "storage",
            LedgerError::Io(_) => "io",
            LedgerError::Json(_) => "json",
            LedgerError::Config(_) => "config",
        }
    }
}
