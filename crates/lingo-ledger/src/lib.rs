//! Learning-progress ledger for the English-learning site.
//!
//! Experience, levels, points, achievements and the history log, persisted
//! through an injected key-value store.

pub mod achievements;
pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod record;
pub mod settings;
pub mod stats;
pub mod storage;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use history::{HistoryEntry, HistoryLog, HISTORY_LIMIT};
pub use ledger::ProgressLedger;
pub use record::{level_threshold, LevelUp, ProgressRecord};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
