//! Key-value persistence port.
//!
//! Records are JSON blobs under fixed keys, the same layout the browser build
//! kept in local storage. Readers never fail: a missing or corrupt blob falls
//! back to the default value and is logged. Writers always replace the whole
//! blob after re-reading it (read-merge-write), which is best effort and not
//! transactional.

use crate::error::StorageError;
use crate::types::{PracticeOverrides, PracticeSettings, ReviewItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage keys.
pub mod keys {
    /// Daily practice log: `{ "YYYY-MM-DD": true }`.
    pub const DAILY_LOG: &str = "konusCengoProgress";
    /// Aggregate progress stats.
    pub const PROGRESS: &str = "konusCengo_progress";
    /// Spaced repetition records.
    pub const SPACED_REPETITION: &str = "konusCengo_spacedRepetition";
    /// Practice settings overrides.
    pub const SETTINGS: &str = "konusCengo_settings";
}

/// Raw string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store (for testing and ephemeral sessions).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load a JSON blob, falling back to the default on any failure.
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read stored record, using default");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "corrupt stored record, using default");
            T::default()
        }
    }
}

/// Encode and store a JSON blob.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}

/// All persisted review records.
pub fn load_review_items<S: KeyValueStore + ?Sized>(store: &S) -> Vec<ReviewItem> {
    load_json(store, keys::SPACED_REPETITION)
}

/// Upsert one review record by identity, rewriting the full set.
pub fn upsert_review_item<S: KeyValueStore + ?Sized>(
    store: &S,
    item: &ReviewItem,
) -> Result<(), StorageError> {
    let mut items = load_review_items(store);
    match items.iter_mut().find(|existing| existing.id == item.id) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
    save_json(store, keys::SPACED_REPETITION, &items)
}

/// Effective practice settings: stored overrides merged over defaults.
pub fn load_settings<S: KeyValueStore + ?Sized>(store: &S) -> PracticeSettings {
    let overrides: PracticeOverrides = load_json(store, keys::SETTINGS);
    PracticeSettings::merge(&PracticeSettings::default(), &overrides)
}

/// Store settings overrides.
pub fn save_settings<S: KeyValueStore + ?Sized>(
    store: &S,
    overrides: &PracticeOverrides,
) -> Result<(), StorageError> {
    save_json(store, keys::SETTINGS, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::sm2::Sm2;
    use crate::algorithm::ReviewAlgorithm;
    use crate::types::{Category, Difficulty, VocabularyItem};
    use chrono::Utc;

    fn review(word: &str) -> ReviewItem {
        Sm2::default().initial_item(
            &VocabularyItem::new(word, "x", Category::Business),
            Utc::now(),
        )
    }

    #[test]
    fn missing_key_gives_default() {
        let store = MemoryStore::new();
        let items = load_review_items(&store);
        assert!(items.is_empty());
    }

    #[test]
    fn corrupt_blob_gives_default() {
        let store = MemoryStore::new();
        store.set(keys::SPACED_REPETITION, "{not json").unwrap();
        assert!(load_review_items(&store).is_empty());
    }

    #[test]
    fn upsert_replaces_by_identity() {
        let store = MemoryStore::new();
        upsert_review_item(&store, &review("Invoice")).unwrap();
        upsert_review_item(&store, &review("Supplier")).unwrap();

        let mut updated = review("Invoice");
        updated.difficulty = Difficulty::Easy;
        updated.interval = 3;
        upsert_review_item(&store, &updated).unwrap();

        let items = load_review_items(&store);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].interval, 3);
        assert_eq!(items[0].difficulty, Difficulty::Easy);
        assert_eq!(items[1].id, "Supplier");
    }

    #[test]
    fn upsert_keeps_records_written_by_others() {
        let store = MemoryStore::new();
        upsert_review_item(&store, &review("Invoice")).unwrap();
        // Another writer appends directly between our reads.
        let mut foreign = load_review_items(&store);
        foreign.push(review("Harbor"));
        save_json(&store, keys::SPACED_REPETITION, &foreign).unwrap();

        upsert_review_item(&store, &review("Anchor")).unwrap();
        let ids: Vec<_> = load_review_items(&store).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["Invoice", "Harbor", "Anchor"]);
    }

    #[test]
    fn settings_default_and_override() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store), PracticeSettings::default());

        save_settings(
            &store,
            &PracticeOverrides {
                review_session_cap: Some(5),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(load_settings(&store).review_session_cap, 5);

        store.set(keys::SETTINGS, "settings?").unwrap();
        assert_eq!(load_settings(&store), PracticeSettings::default());
    }
}
