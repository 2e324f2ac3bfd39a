//! Learning history log, newest first, capped.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Maximum number of history entries kept
pub const HISTORY_LIMIT: usize = 20;

/// Single history line shown on the profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub activity: String,
    pub description: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
}

impl HistoryEntry {
    pub fn new(activity: &str, description: &str, at: NaiveDateTime) -> Self {
        Self {
            activity: activity.to_string(),
            description: description.to_string(),
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M").to_string(),
        }
    }
}

/// Ordered history, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    pub entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Prepend an entry and evict the oldest beyond `limit`
    pub fn push_front(&mut self, entry: HistoryEntry, limit: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(limit);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }
}

/// Example entries written the first time the history is read
pub fn seed_entries(now: NaiveDateTime) -> Vec<HistoryEntry> {
    vec![
        HistoryEntry::new("词汇练习", "完成了20个单词的学习", now),
        HistoryEntry::new("听力练习", "完成了一段听力材料", now - Duration::days(1)),
        HistoryEntry::new("获得成就", "解锁了「初次学习」成就", now - Duration::days(2)),
    ]
}
