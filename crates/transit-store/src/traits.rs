/// Flat, string-keyed store with per-key atomic operations.
///
/// All implementations must satisfy these invariants:
/// - `insert_if_absent`, `get`, `remove` and `contains_key` are atomic and
///   linearizable for the key they touch.
/// - `retain` is atomic per entry only; entries inserted while it runs may or
///   may not be visited.
/// - Values are handed out as clones; the store keeps its own copy.
pub trait AtomicStore<V>: Send + Sync {
    /// Store `value` under `key` unless the key is already taken.
    ///
    /// Returns `None` when the value was stored, or a clone of the value that
    /// already occupied the key (which is left untouched).
    fn insert_if_absent(&self, key: &str, value: V) -> Option<V>;

    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<V>;

    /// Remove `key`, returning the value it held.
    fn remove(&self, key: &str) -> Option<V>;

    /// Remove `key` only if its current value satisfies `predicate`.
    ///
    /// The check and the removal happen atomically. Returns the removed
    /// value, or `None` if the key was absent or the predicate declined.
    fn remove_if(&self, key: &str, predicate: &mut dyn FnMut(&V) -> bool) -> Option<V>;

    /// Check whether `key` is present.
    fn contains_key(&self, key: &str) -> bool;

    /// Drop every entry for which `keep` returns `false`.
    ///
    /// Returns the number of entries removed.
    fn retain(&self, keep: &mut dyn FnMut(&str, &V) -> bool) -> usize;

    /// Whether some entry satisfies `predicate`, stopping at the first match.
    ///
    /// Like `retain`, the scan is atomic per entry only.
    fn any(&self, predicate: &mut dyn FnMut(&str, &V) -> bool) -> bool;

    /// Number of entries currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all keys, in no particular order.
    fn keys(&self) -> Vec<String>;
}
