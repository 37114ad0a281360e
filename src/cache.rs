use std::collections::{BTreeSet, HashMap};

use crate::datemath;
use crate::event::EventsBySource;
use crate::grid::GridRange;

/// Ids of the sources currently toggled on. Sorted iteration keeps the
/// cache key independent of toggle order.
pub type EnabledSet = BTreeSet<String>;

/// Completed fetch result for one grid range and one enabled-source
/// snapshot. Immutable once stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub range: GridRange,
    pub sources: EnabledSet,
    pub events_by_source: EventsBySource,
}

/// Deterministic key for a range + enabled-set pair: date-only bounds
/// plus the sorted, comma-joined source ids.
pub fn cache_key(range: &GridRange, enabled: &EnabledSet) -> String {
    let ids: Vec<&str> = enabled.iter().map(String::as_str).collect();
    format!(
        "{}_{}|{}",
        datemath::date_only_key(range.start),
        datemath::date_only_key(range.end),
        ids.join(",")
    )
}

/// Insert-only store of completed fetch results keyed by [`cache_key`].
/// Stale entries persist until the caller evicts; in-flight tracking is
/// the caller's responsibility.
#[derive(Debug, Default)]
pub struct RangeCache {
    entries: HashMap<String, CacheEntry>,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Stores an entry once. A later `put` for the same key is ignored,
    /// so a stored entry is never overwritten.
    pub fn put(&mut self, key: String, entry: CacheEntry) {
        self.entries.entry(key).or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeekStart;

    fn entry_with_sources(ids: &[&str]) -> (String, CacheEntry) {
        let range = GridRange::for_month(2024, 2, WeekStart::Monday);
        let sources: EnabledSet = ids.iter().map(|s| s.to_string()).collect();
        let key = cache_key(&range, &sources);
        (
            key,
            CacheEntry {
                range,
                sources,
                events_by_source: EventsBySource::new(),
            },
        )
    }

    #[test]
    fn key_contains_range_bounds_and_sorted_ids() {
        let (key, _) = entry_with_sources(&["calendar.work", "calendar.family"]);
        assert_eq!(key, "2024-01-29_2024-03-04|calendar.family,calendar.work");
    }

    #[test]
    fn key_is_invariant_under_toggle_order() {
        let (a, _) = entry_with_sources(&["b", "a"]);
        let (b, _) = entry_with_sources(&["a", "b"]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_enabled_set_yields_different_key() {
        let (a, _) = entry_with_sources(&["a", "b"]);
        let (b, _) = entry_with_sources(&["a"]);
        assert_ne!(a, b);
    }

    #[test]
    fn put_stores_once_and_never_overwrites() {
        let mut cache = RangeCache::new();
        let (key, first) = entry_with_sources(&["a"]);

        let (_, mut second) = entry_with_sources(&["a"]);
        second
            .events_by_source
            .insert("a".to_string(), Vec::new());

        cache.put(key.clone(), first);
        cache.put(key.clone(), second);

        assert_eq!(cache.len(), 1);
        let stored = cache.get(&key).unwrap();
        assert!(stored.events_by_source.is_empty());
    }

    #[test]
    fn get_absent_key() {
        let cache = RangeCache::new();
        assert!(cache.get("2024-01-29_2024-03-04|a").is_none());
        assert!(cache.is_empty());
    }
}
