//! Progress ledger: the single accessor for the progress record and history.
//!
//! Every mutation is a full load-modify-save cycle against the store, so two
//! callers holding stale copies never clobber each other's changes. Storage
//! failures never reach the caller: they are logged and the value is kept in
//! a session overlay that later reads prefer over the store. A key whose read
//! failed is never written back, so data that could not be read is not
//! replaced by defaults.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::history::{seed_entries, HistoryEntry, HistoryLog, HISTORY_LIMIT};
use crate::record::{LevelUp, ProgressRecord, GUEST_NAME};
use crate::storage::{KeyValueStore, HISTORY_KEY, USER_DATA_KEY};

type SaveHook = Box<dyn FnMut(&ProgressRecord)>;

/// Outcome of reading one key
enum Read<T> {
    Value(T),
    /// Absent or malformed: safe to replace with a default
    Missing,
    /// The store failed: what it holds is unknown and must not be overwritten
    Unavailable,
}

impl<T> Read<T> {
    fn value(self) -> Option<T> {
        match self {
            Read::Value(v) => Some(v),
            Read::Missing | Read::Unavailable => None,
        }
    }
}

/// Ledger over a key-value store
pub struct ProgressLedger<S: KeyValueStore> {
    store: S,
    history_limit: usize,
    seed_history: bool,
    /// Values whose write failed this session, by key
    overlay: HashMap<String, String>,
    /// Keys whose stored value could not be read this session
    unreadable: RefCell<HashSet<String>>,
    hooks: Vec<SaveHook>,
}

impl<S: KeyValueStore> ProgressLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            history_limit: HISTORY_LIMIT,
            seed_history: true,
            overlay: HashMap::new(),
            unreadable: RefCell::new(HashSet::new()),
            hooks: Vec::new(),
        }
    }

    pub fn with_config(store: S, config: &LedgerConfig) -> Self {
        let mut ledger = Self::new(store);
        ledger.history_limit = config.history_limit.max(1);
        ledger.seed_history = config.seed_history;
        ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether any change is held in memory only
    pub fn has_unsaved_changes(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// Register a callback run after every save (UI refresh)
    pub fn on_save<F>(&mut self, hook: F)
    where
        F: FnMut(&ProgressRecord) + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    // === Record ===

    /// Read the record, or a fresh default one. Never fails.
    pub fn load(&self) -> ProgressRecord {
        let mut record: ProgressRecord = self.read_json(USER_DATA_KEY).value().unwrap_or_default();
        record.normalize();
        record
    }

    /// Persist the full record, replacing the previous one
    pub fn save(&mut self, record: &ProgressRecord) {
        match serde_json::to_string(record) {
            Ok(json) => self.write(USER_DATA_KEY, json),
            Err(e) => warn!("Failed to serialize progress record: {}", e),
        }
        for hook in &mut self.hooks {
            hook(record);
        }
    }

    /// Add experience, leveling up as needed
    pub fn add_experience(&mut self, amount: u64) -> LevelUp {
        let mut record = self.load();
        let up = record.gain_experience(amount);
        if up.leveled_up() {
            info!(
                "Level up: {} -> {} (+{} points)",
                up.from, up.to, up.bonus_points
            );
        }
        self.save(&record);
        up
    }

    pub fn add_points(&mut self, amount: u64) -> ProgressRecord {
        self.mutate(|r| r.points = r.points.saturating_add(amount))
    }

    /// Spend points if the balance covers it. Returns false and leaves the
    /// record untouched otherwise.
    pub fn spend_points(&mut self, amount: u64) -> bool {
        let mut record = self.load();
        if record.points < amount {
            debug!("Insufficient points: have {}, need {}", record.points, amount);
            return false;
        }
        record.points -= amount;
        self.save(&record);
        true
    }

    /// Add minutes of learning time
    pub fn add_learning_time(&mut self, minutes: u64) -> ProgressRecord {
        self.mutate(|r| r.learning_time = r.learning_time.saturating_add(minutes))
    }

    pub fn add_words_learned(&mut self, count: u64) -> ProgressRecord {
        self.mutate(|r| r.words_learned = r.words_learned.saturating_add(count))
    }

    pub fn add_correct_answers(&mut self, count: u64) -> ProgressRecord {
        self.mutate(|r| r.correct_answers = r.correct_answers.saturating_add(count))
    }

    /// Unlock an achievement. Returns true only the first time an id is added,
    /// which is the caller's cue to show a notification.
    pub fn add_achievement(&mut self, id: &str) -> bool {
        let mut record = self.load();
        if !record.unlock(id) {
            return false;
        }
        info!("Achievement unlocked: {}", id);
        self.save(&record);
        true
    }

    /// Update display name and email from the settings page.
    /// A blank name falls back to the guest name.
    pub fn update_profile(&mut self, username: &str, email: Option<&str>) -> ProgressRecord {
        let username = match username.trim() {
            "" => GUEST_NAME.to_string(),
            name => name.to_string(),
        };
        let email = email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string);
        self.mutate(move |r| {
            r.username = username;
            r.email = email;
        })
    }

    fn mutate<F>(&mut self, f: F) -> ProgressRecord
    where
        F: FnOnce(&mut ProgressRecord),
    {
        let mut record = self.load();
        f(&mut record);
        self.save(&record);
        record
    }

    // === History ===

    /// Read the history log, seeding example entries on first access
    pub fn history(&mut self) -> HistoryLog {
        self.history_at(Local::now().naive_local())
    }

    /// Prepend an entry stamped with the current local time
    pub fn record_history(&mut self, activity: &str, description: &str) -> HistoryLog {
        self.record_history_at(activity, description, Local::now().naive_local())
    }

    /// Prepend an entry stamped with `at`
    pub fn record_history_at(
        &mut self,
        activity: &str,
        description: &str,
        at: NaiveDateTime,
    ) -> HistoryLog {
        let mut log = self.history_at(at);
        log.push_front(HistoryEntry::new(activity, description, at), self.history_limit);
        self.write_history(&log);
        log
    }

    fn history_at(&mut self, now: NaiveDateTime) -> HistoryLog {
        match self.read_json::<HistoryLog>(HISTORY_KEY) {
            Read::Value(mut log) => {
                log.entries.truncate(self.history_limit);
                return log;
            }
            // Real history may still be stored; do not seed over it
            Read::Unavailable => return HistoryLog::default(),
            Read::Missing => {}
        }
        if !self.seed_history {
            return HistoryLog::default();
        }
        let mut seeded = seed_entries(now);
        seeded.truncate(self.history_limit);
        let log = HistoryLog::new(seeded);
        debug!("Seeding learning history with {} entries", log.len());
        self.write_history(&log);
        log
    }

    fn write_history(&mut self, log: &HistoryLog) {
        match serde_json::to_string(log) {
            Ok(json) => self.write(HISTORY_KEY, json),
            Err(e) => warn!("Failed to serialize learning history: {}", e),
        }
    }

    // === Storage plumbing ===

    /// Read and parse a key. Absent and malformed values are `Missing`;
    /// a failing store is `Unavailable` and marks the key unreadable.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Read<T> {
        let raw = match self.overlay.get(key) {
            Some(value) => value.clone(),
            None => match self.store.get(key) {
                Ok(Some(value)) => value,
                Ok(None) => return Read::Missing,
                Err(e) => {
                    warn!("Failed to read {} ({}): {}", key, e.kind(), e);
                    self.unreadable.borrow_mut().insert(key.to_string());
                    return Read::Unavailable;
                }
            },
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Read::Value(value),
            Err(e) => {
                warn!("Malformed {} replaced by default: {}", key, e);
                Read::Missing
            }
        }
    }

    fn write(&mut self, key: &str, value: String) {
        if self.unreadable.borrow().contains(key) {
            warn!("Not persisting {}: stored value could not be read, keeping for this session", key);
            self.overlay.insert(key.to_string(), value);
            return;
        }
        match self.store.set(key, &value) {
            Ok(()) => {
                self.overlay.remove(key);
            }
            Err(e) => {
                warn!("Failed to persist {} ({}), keeping for this session: {}", key, e.kind(), e);
                self.overlay.insert(key.to_string(), value);
            }
        }
    }
}
