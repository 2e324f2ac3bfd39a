//! Profile settings, avatar and dark-mode flag.
//!
//! These share the ledger's storage but not its invariants, so they are
//! plain read/write helpers over any `KeyValueStore`. Reads never fail:
//! absent or malformed values come back as defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LedgerError;
use crate::storage::{KeyValueStore, AVATAR_KEY, DARK_MODE_KEY, SETTINGS_KEY};

/// Scratch state of the profile-editing form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

pub fn load_settings(store: &impl KeyValueStore) -> UserSettings {
    match store.get(SETTINGS_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Malformed {} replaced by default: {}", SETTINGS_KEY, e);
            UserSettings::default()
        }),
        Ok(None) => UserSettings::default(),
        Err(e) => {
            warn!("Failed to read {}: {}", SETTINGS_KEY, e);
            UserSettings::default()
        }
    }
}

pub fn save_settings(store: &mut impl KeyValueStore, settings: &UserSettings) -> Result<(), LedgerError> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)
}

/// Dark-mode flag, default off
pub fn dark_mode(store: &impl KeyValueStore) -> bool {
    match store.get(DARK_MODE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(raw.trim()).unwrap_or(false),
        _ => false,
    }
}

pub fn set_dark_mode(store: &mut impl KeyValueStore, enabled: bool) -> Result<(), LedgerError> {
    store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
}

/// Avatar image data (typically a data URL)
pub fn avatar(store: &impl KeyValueStore) -> Option<String> {
    store.get(AVATAR_KEY).ok().flatten().filter(|a| !a.is_empty())
}

pub fn set_avatar(store: &mut impl KeyValueStore, data: &str) -> Result<(), LedgerError> {
    store.set(AVATAR_KEY, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_settings_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_settings(&store), UserSettings::default());

        let settings = UserSettings {
            username: "Wang".to_string(),
            email: "wang@example.com".to_string(),
            password: None,
        };
        save_settings(&mut store, &settings).unwrap();
        assert_eq!(load_settings(&store), settings);
        assert!(!store.get(SETTINGS_KEY).unwrap().unwrap().contains("password"));
    }

    #[test]
    fn test_malformed_settings_default() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "[1,2]").unwrap();
        assert_eq!(load_settings(&store), UserSettings::default());
    }

    #[test]
    fn test_dark_mode() {
        let mut store = MemoryStore::new();
        assert!(!dark_mode(&store));
        set_dark_mode(&mut store, true).unwrap();
        assert!(dark_mode(&store));

        store.set(DARK_MODE_KEY, "yes").unwrap();
        assert!(!dark_mode(&store));
    }

    #[test]
    fn test_avatar() {
        let mut store = MemoryStore::new();
        assert_eq!(avatar(&store), None);
        set_avatar(&mut store, "data:image/png;base64,AAAA").unwrap();
        assert_eq!(avatar(&store).as_deref(), Some("data:image/png;base64,AAAA"));
    }
}
