use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{StoreError, StoreResult};
use crate::traits::AtomicStore;

/// `DashMap`-backed store.
///
/// Keys are spread over independently locked shards, so operations on
/// unrelated keys rarely contend. This is the default backend.
pub struct ShardedStore<V> {
    map: DashMap<String, V>,
}

impl<V> ShardedStore<V> {
    /// Create a new empty store with the default shard amount.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Create a store pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: DashMap::with_capacity(capacity),
        }
    }

    /// Create a store with an explicit number of shards.
    pub fn with_shard_amount(capacity: usize, shard_amount: usize) -> StoreResult<Self> {
        if shard_amount < 2 || !shard_amount.is_power_of_two() {
            return Err(StoreError::InvalidShardAmount(shard_amount));
        }
        Ok(Self {
            map: DashMap::with_capacity_and_shard_amount(capacity, shard_amount),
        })
    }
}

impl<V> Default for ShardedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> AtomicStore<V> for ShardedStore<V> {
    fn insert_if_absent(&self, key: &str, value: V) -> Option<V> {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(value);
                None
            }
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.map.remove(key).map(|(_, value)| value)
    }

    fn remove_if(&self, key: &str, predicate: &mut dyn FnMut(&V) -> bool) -> Option<V> {
        self.map
            .remove_if(key, |_, value| predicate(value))
            .map(|(_, value)| value)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &V) -> bool) -> usize {
        let mut removed = 0;
        self.map.retain(|key, value| {
            let kept = keep(key.as_str(), &*value);
            if !kept {
                removed += 1;
            }
            kept
        });
        removed
    }

    fn any(&self, predicate: &mut dyn FnMut(&str, &V) -> bool) -> bool {
        self.map
            .iter()
            .any(|entry| predicate(entry.key().as_str(), entry.value()))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<V> fmt::Debug for ShardedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedStore")
            .field("entries", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let store = ShardedStore::new();
        assert_eq!(store.insert_if_absent("A/x", 1), None);
        assert_eq!(store.insert_if_absent("A/x", 2), Some(1));
        assert_eq!(store.get("A/x"), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_returns_value_once() {
        let store = ShardedStore::new();
        store.insert_if_absent("k", "v");
        assert_eq!(store.remove("k"), Some("v"));
        assert_eq!(store.remove("k"), None);
        assert!(!store.contains_key("k"));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_if_respects_predicate() {
        let store = ShardedStore::new();
        store.insert_if_absent("k", 10);
        assert_eq!(store.remove_if("k", &mut |v| *v == 11), None);
        assert!(store.contains_key("k"));
        assert_eq!(store.remove_if("k", &mut |v| *v == 10), Some(10));
        assert_eq!(store.remove_if("k", &mut |_| true), None);
    }

    #[test]
    fn retain_counts_removed_entries() {
        let store = ShardedStore::new();
        for key in ["a/1", "a/2", "b/1"] {
            store.insert_if_absent(key, ());
        }
        let removed = store.retain(&mut |key, _| !key.starts_with("a/"));
        assert_eq!(removed, 2);
        assert_eq!(store.keys(), vec!["b/1".to_string()]);
    }

    #[test]
    fn any_stops_at_first_match() {
        let store = ShardedStore::new();
        for (key, value) in [("a/1", 1), ("a/2", 2), ("b/1", 3)] {
            store.insert_if_absent(key, value);
        }
        let mut visited = 0;
        assert!(store.any(&mut |key, _| {
            visited += 1;
            key.starts_with("a/")
        }));
        assert!(visited < 3);
        assert!(!store.any(&mut |_, value| *value > 3));
    }

    #[test]
    fn shard_amount_must_be_power_of_two() {
        assert_eq!(
            ShardedStore::<u8>::with_shard_amount(0, 3).unwrap_err(),
            StoreError::InvalidShardAmount(3)
        );
        assert!(ShardedStore::<u8>::with_shard_amount(0, 1).is_err());
        assert!(ShardedStore::<u8>::with_shard_amount(16, 8).is_ok());
    }

    #[test]
    fn concurrent_insert_if_absent_has_single_winner() {
        let store = Arc::new(ShardedStore::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let winners = winners.clone();
                thread::spawn(move || {
                    if store.insert_if_absent("shared", i).is_none() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }
}
