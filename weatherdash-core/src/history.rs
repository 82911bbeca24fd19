//! Bounded, newest-first log of past searches.
//!
//! The log is a recency window, not an LRU cache: every completed search
//! prepends one entry and the oldest entry falls off once the window is full.
//! Nothing is reordered or merged on repeat searches.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::StorageError,
    storage::{HISTORY_KEY, KeyValueStore},
};

pub const HISTORY_CAPACITY: usize = 5;

/// Separator between the city and the outcome in the stored text form.
pub const SEPARATOR: char = '→';

const NOT_FOUND: &str = "Not found";
const LEGACY_FAILURE_MARK: &str = "❌";

/// Outcome of one search.
///
/// Stored as `"<city> → <temp>°C"` or `"<city> → Not found"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HistoryEntry {
    Success { city: String, temp_c: f64 },
    Failure { city: String },
}

impl HistoryEntry {
    pub fn success(city: impl Into<String>, temp_c: f64) -> Self {
        Self::Success { city: city.into(), temp_c }
    }

    pub fn failure(city: impl Into<String>) -> Self {
        Self::Failure { city: city.into() }
    }

    pub fn city(&self) -> &str {
        match self {
            Self::Success { city, .. } | Self::Failure { city } => city,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { city, temp_c } => write!(f, "{city} {SEPARATOR} {temp_c}°C"),
            Self::Failure { city } => write!(f, "{city} {SEPARATOR} {NOT_FOUND}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed history entry: {0:?}")]
pub struct HistoryParseError(String);

impl FromStr for HistoryEntry {
    type Err = HistoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HistoryParseError(s.to_string());

        // The outcome never contains the separator; the city may.
        let (city, outcome) = s.rsplit_once(SEPARATOR).ok_or_else(malformed)?;
        let city = city.trim();
        if city.is_empty() {
            return Err(malformed());
        }

        let outcome = outcome.trim();
        let outcome = outcome.strip_prefix(LEGACY_FAILURE_MARK).unwrap_or(outcome).trim_start();

        if outcome == NOT_FOUND {
            return Ok(Self::failure(city));
        }

        let temp_c = outcome
            .strip_suffix("°C")
            .and_then(|t| t.trim().parse::<f64>().ok())
            .ok_or_else(malformed)?;

        Ok(Self::success(city, temp_c))
    }
}

impl From<HistoryEntry> for String {
    fn from(entry: HistoryEntry) -> Self {
        entry.to_string()
    }
}

impl TryFrom<String> for HistoryEntry {
    type Error = HistoryParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Search history backed by the [`HISTORY_KEY`] slot.
///
/// Writes go through `record` followed by `persist`; both take `&mut`/`&`
/// on the same owner, so two searches can never interleave their pairs.
#[derive(Debug)]
pub struct HistoryCache {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl HistoryCache {
    /// Create a cache with the default capacity and load it from the store.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut cache = Self::with_capacity(store, HISTORY_CAPACITY);
        cache.load();
        cache
    }

    /// Create an empty, not yet loaded cache.
    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, entries: Vec::new(), capacity }
    }

    /// Replace the in-memory sequence with the stored one.
    ///
    /// Never fails: a missing, unreadable or corrupt slot yields an empty history.
    pub fn load(&mut self) -> &[HistoryEntry] {
        let mut entries = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "history slot unreadable, starting empty");
                Vec::new()
            }
        };
        entries.truncate(self.capacity);

        self.entries = entries;
        &self.entries
    }

    /// Prepend `entry`, dropping the oldest entry if the window overflows.
    pub fn record(&mut self, entry: HistoryEntry) -> &[HistoryEntry] {
        debug!(entry = %entry, "recording search");
        self.entries.insert(0, entry);
        if self.entries.len() > self.capacity {
            self.entries.pop();
        }
        &self.entries
    }

    /// Write the full sequence to the slot, overwriting the previous value.
    pub fn persist(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.entries)
            .map_err(|source| StorageError::Encode { key: HISTORY_KEY.to_string(), source })?;
        self.store.set(HISTORY_KEY, &encoded)
    }

    /// Empty the history and delete the slot.
    ///
    /// The in-memory sequence is emptied even when the slot removal fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.store.remove(HISTORY_KEY)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(raw: &str) -> Vec<HistoryEntry> {
    match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "history slot is corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn text_form_matches_stored_layout() {
        assert_eq!(HistoryEntry::success("Hanoi", 31.0).to_string(), "Hanoi → 31°C");
        assert_eq!(HistoryEntry::success("Hue", 27.4).to_string(), "Hue → 27.4°C");
        assert_eq!(HistoryEntry::failure("Atlantis").to_string(), "Atlantis → Not found");
    }

    #[test]
    fn parses_stored_layout() {
        assert_eq!(
            "Paris → 20°C".parse::<HistoryEntry>(),
            Ok(HistoryEntry::success("Paris", 20.0))
        );
        assert_eq!(
            "Da Nang → -1.5°C".parse::<HistoryEntry>(),
            Ok(HistoryEntry::success("Da Nang", -1.5))
        );
        assert_eq!(
            "Atlantis → Not found".parse::<HistoryEntry>(),
            Ok(HistoryEntry::failure("Atlantis"))
        );
    }

    #[test]
    fn parses_legacy_failure_marker() {
        assert_eq!(
            "Atlantis → ❌ Not found".parse::<HistoryEntry>(),
            Ok(HistoryEntry::failure("Atlantis"))
        );
    }

    #[test]
    fn rejects_malformed_text() {
        assert!("Paris".parse::<HistoryEntry>().is_err());
        assert!(" → 20°C".parse::<HistoryEntry>().is_err());
        assert!("Paris → warm".parse::<HistoryEntry>().is_err());
    }

    #[test]
    fn length_is_min_of_records_and_capacity() {
        for n in 0..12 {
            let mut cache = HistoryCache::open(store());
            for i in 0..n {
                cache.record(HistoryEntry::success(format!("City{i}"), i as f64));
            }
            assert_eq!(cache.len(), n.min(HISTORY_CAPACITY), "after {n} records");
        }
    }

    #[test]
    fn keeps_newest_first_and_drops_oldest() {
        let mut cache = HistoryCache::open(store());
        for city in ["A", "B", "C", "D", "E", "F", "G"] {
            cache.record(HistoryEntry::success(city, 20.0));
        }

        let cities: Vec<_> = cache.entries().iter().map(HistoryEntry::city).collect();
        assert_eq!(cities, ["G", "F", "E", "D", "C"]);
    }

    #[test]
    fn record_returns_new_sequence() {
        let mut cache = HistoryCache::open(store());
        let seq = cache.record(HistoryEntry::failure("Atlantis"));
        assert_eq!(seq, [HistoryEntry::failure("Atlantis")]);
    }

    #[test]
    fn failure_and_success_for_same_city_are_separate_entries() {
        let mut cache = HistoryCache::open(store());
        cache.record(HistoryEntry::success("Hanoi", 31.0));
        cache.record(HistoryEntry::failure("Hanoi"));
        cache.record(HistoryEntry::success("Hanoi", 31.0));

        assert_eq!(
            cache.entries(),
            [
                HistoryEntry::success("Hanoi", 31.0),
                HistoryEntry::failure("Hanoi"),
                HistoryEntry::success("Hanoi", 31.0),
            ]
        );
    }

    #[test]
    fn load_after_persist_returns_same_sequence() {
        let store = store();
        let mut cache = HistoryCache::open(store.clone());
        cache.record(HistoryEntry::success("Hanoi", 31.0));
        cache.record(HistoryEntry::failure("Atlantis"));
        cache.record(HistoryEntry::success("Hue", 27.5));
        cache.persist().unwrap();

        let expected = cache.entries().to_vec();
        assert_eq!(cache.load(), expected.as_slice());

        let reopened = HistoryCache::open(store);
        assert_eq!(reopened.entries(), expected.as_slice());
    }

    #[test]
    fn persisted_slot_is_json_array_of_strings() {
        let store = store();
        let mut cache = HistoryCache::open(store.clone());
        cache.record(HistoryEntry::failure("Atlantis"));
        cache.record(HistoryEntry::success("Paris", 20.0));
        cache.persist().unwrap();

        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"["Paris → 20°C","Atlantis → Not found"]"#);
    }

    #[test]
    fn clear_removes_slot_and_reload_is_empty() {
        let store = store();
        let mut cache = HistoryCache::open(store.clone());
        cache.record(HistoryEntry::success("Hanoi", 31.0));
        cache.persist().unwrap();

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);

        drop(cache);
        let mut reopened = HistoryCache::open(store);
        assert!(reopened.load().is_empty());
    }

    #[test]
    fn cities_containing_separator_survive_reload() {
        let store = store();
        let mut cache = HistoryCache::open(store.clone());
        cache.record(HistoryEntry::success("Hanoi", 31.0));
        cache.record(HistoryEntry::failure("Paris→Lyon"));
        cache.record(HistoryEntry::success("A→B", 20.0));
        cache.persist().unwrap();

        let reopened = HistoryCache::open(store);
        assert_eq!(
            reopened.entries(),
            [
                HistoryEntry::success("A→B", 20.0),
                HistoryEntry::failure("Paris→Lyon"),
                HistoryEntry::success("Hanoi", 31.0),
            ]
        );
    }

    #[test]
    fn corrupt_slot_loads_empty() {
        let store = store();
        for raw in ["not json", "null", "{}", r#"["Paris → warm"]"#, r#"[1, 2]"#] {
            store.set(HISTORY_KEY, raw).unwrap();
            let cache = HistoryCache::open(store.clone());
            assert!(cache.is_empty(), "slot {raw:?} should load empty");
        }
    }

    #[test]
    fn load_trims_oversized_slot_to_capacity() {
        let store = store();
        let raw = serde_json::to_string(
            &(0..8).map(|i| format!("City{i} → {i}°C")).collect::<Vec<_>>(),
        )
        .unwrap();
        store.set(HISTORY_KEY, &raw).unwrap();

        let cache = HistoryCache::open(store);
        assert_eq!(cache.len(), HISTORY_CAPACITY);
        assert_eq!(cache.entries()[0].city(), "City0");
    }

    #[test]
    fn legacy_slot_contents_still_load() {
        let store = store();
        store.set(HISTORY_KEY, r#"["Hanoi → 31°C","Atlantis → ❌ Not found"]"#).unwrap();

        let cache = HistoryCache::open(store);
        assert_eq!(
            cache.entries(),
            [HistoryEntry::success("Hanoi", 31.0), HistoryEntry::failure("Atlantis")]
        );
    }
}
