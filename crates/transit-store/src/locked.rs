use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::traits::AtomicStore;

/// `HashMap` behind a single `RwLock`.
///
/// Every write serializes on one lock. Useful for comparison with
/// [`ShardedStore`](crate::ShardedStore) and for small, mostly-read forests.
pub struct LockedStore<V> {
    map: RwLock<HashMap<String, V>>,
}

impl<V> LockedStore<V> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl<V> Default for LockedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> AtomicStore<V> for LockedStore<V> {
    fn insert_if_absent(&self, key: &str, value: V) -> Option<V> {
        let mut map = self.map.write();
        if let Some(existing) = map.get(key) {
            return Some(existing.clone());
        }
        map.insert(key.to_string(), value);
        None
    }

    fn get(&self, key: &str) -> Option<V> {
        self.map.read().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.map.write().remove(key)
    }

    fn remove_if(&self, key: &str, predicate: &mut dyn FnMut(&V) -> bool) -> Option<V> {
        let mut map = self.map.write();
        if map.get(key).is_some_and(|value| predicate(value)) {
            map.remove(key)
        } else {
            None
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &V) -> bool) -> usize {
        let mut map = self.map.write();
        let before = map.len();
        map.retain(|key, value| keep(key.as_str(), &*value));
        before - map.len()
    }

    fn any(&self, predicate: &mut dyn FnMut(&str, &V) -> bool) -> bool {
        self.map
            .read()
            .iter()
            .any(|(key, value)| predicate(key.as_str(), value))
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.read().keys().cloned().collect()
    }
}

impl<V> fmt::Debug for LockedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedStore")
            .field("entries", &self.map.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn insert_get_remove() {
        let store = LockedStore::new();
        assert_eq!(store.insert_if_absent("A/docs/", 7), None);
        assert_eq!(store.insert_if_absent("A/docs/", 8), Some(7));
        assert!(store.contains_key("A/docs/"));
        assert_eq!(store.remove("A/docs/"), Some(7));
        assert_eq!(store.get("A/docs/"), None);
    }

    #[test]
    fn remove_if_leaves_mismatched_value() {
        let store = LockedStore::new();
        store.insert_if_absent("A/", "placeholder");
        assert_eq!(store.remove_if("A/", &mut |v| *v == "other"), None);
        assert_eq!(store.remove_if("A/", &mut |v| *v == "placeholder"), Some("placeholder"));
        assert!(store.is_empty());
    }

    #[test]
    fn retain_under_write_lock() {
        let store = LockedStore::with_capacity(4);
        for i in 0..10 {
            store.insert_if_absent(&format!("k{i}"), i);
        }
        let removed = store.retain(&mut |_, value| value % 2 == 0);
        assert_eq!(removed, 5);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn any_under_read_lock() {
        let store = LockedStore::new();
        store.insert_if_absent("A/docs/", 1);
        store.insert_if_absent("B/docs/", 2);
        assert!(store.any(&mut |key, value| key.starts_with("B/") && *value == 2));
        assert!(!store.any(&mut |key, _| key.starts_with("C/")));
    }

    #[test]
    fn parallel_disjoint_inserts_all_land() {
        let store = Arc::new(LockedStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        store.insert_if_absent(&format!("t{t}/{i}"), i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }
}
