use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use super::types::{CachedElementSet, ElementRecord};

pub const DEFAULT_FRESHNESS: Duration = Duration::hours(1);

/// Most recently acquired element set per catalog identifier.
///
/// Entries are swapped in whole behind an `Arc`, so a reader sees either the
/// previous or the new entry, never a mix. The lock is only held for the map
/// operation itself.
pub struct ElementSetCache {
    freshness: Duration,
    entries: RwLock<HashMap<u32, Arc<CachedElementSet>>>,
}

impl ElementSetCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, norad_id: u32) -> Option<CachedElementSet> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&norad_id).map(|e| e.as_ref().clone())
    }

    /// Entry for `norad_id` if it is still inside the freshness window.
    pub fn get_fresh(&self, norad_id: u32) -> Option<CachedElementSet> {
        self.get(norad_id).filter(|e| self.is_fresh(e))
    }

    pub fn put(&self, norad_id: u32, record: ElementRecord) -> CachedElementSet {
        self.put_at(norad_id, record, Utc::now())
    }

    pub fn put_at(
        &self,
        norad_id: u32,
        record: ElementRecord,
        acquired_at: DateTime<Utc>,
    ) -> CachedElementSet {
        let entry = CachedElementSet {
            norad_id,
            name: record.name,
            elements: record.elements,
            acquired_at,
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(norad_id, Arc::new(entry.clone()));
        entry
    }

    pub fn is_fresh(&self, entry: &CachedElementSet) -> bool {
        self.is_fresh_at(entry, Utc::now())
    }

    pub fn is_fresh_at(&self, entry: &CachedElementSet, now: DateTime<Utc>) -> bool {
        now - entry.acquired_at < self.freshness
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ElementSetCache {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS)
    }
}
