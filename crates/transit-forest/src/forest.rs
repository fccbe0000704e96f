//! The indexed forest and its tree algorithms.
//!
//! [`IndexedForest`] keeps every node of every account in one flat
//! [`AtomicStore`], keyed by [`NodeKey`]. Tree structure lives in the nodes
//! themselves: owning child links downward, weak parent links upward.
//!
//! # Invariants
//!
//! - A key is indexed only while its node carries a payload or has
//!   descendants that do; empty placeholders are pruned on removal.
//! - A node's parent is always the node of its immediate parent path in the
//!   same account.
//! - The root path is never synthesized as a placeholder; it is indexed only
//!   when registered explicitly, and then owns every top-level node of its
//!   account.
//!
//! Composite walks are sequences of single-key operations. They tolerate
//! interleaving: a chain may be linked onto an ancestor that is being pruned
//! at the same moment, leaving it under a detached parent until the chain is
//! removed in turn.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use transit_store::{AtomicStore, ShardedStore};
use transit_types::{AccountName, NodeKey, RemotePath};

use crate::config::ForestConfig;
use crate::error::ForestResult;
use crate::node::Node;
use crate::outcome::{Registration, Removal};

type NodeRef<V> = Arc<Node<V>>;

/// Forest of per-account trees of tracked remote paths.
///
/// Shared between threads by reference (typically behind an `Arc`); no
/// external locking is needed.
pub struct IndexedForest<V> {
    store: Box<dyn AtomicStore<NodeRef<V>>>,
}

impl<V> IndexedForest<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty forest on the default sharded store.
    pub fn new() -> Self {
        Self {
            store: Box::new(ShardedStore::new()),
        }
    }

    /// Create an empty forest from a configuration.
    pub fn with_config(config: &ForestConfig) -> ForestResult<Self> {
        config.validate()?;
        let store = config.backend.open(config.initial_capacity)?;
        Ok(Self { store })
    }

    /// Number of indexed nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is tracked for any account.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // ---------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------

    /// Start tracking `path` for `account`, carrying `value`.
    ///
    /// If the path is already indexed (as a payload-bearing node or as a
    /// placeholder) nothing changes and [`Registration::AlreadyTracked`] is
    /// returned. Otherwise the new node is linked upward, synthesizing
    /// placeholders for untracked ancestors until a tracked one (the
    /// attachment point) or the root is reached. Registering the root itself
    /// links the account's existing top-level nodes under it.
    pub fn register(
        &self,
        account: &AccountName,
        path: &RemotePath,
        value: Option<V>,
    ) -> Registration {
        let target = Node::new(account.clone(), path.clone(), value);
        if self
            .store
            .insert_if_absent(target.key().as_str(), Arc::clone(&target))
            .is_some()
        {
            debug!(key = %target.key(), "path already tracked");
            return Registration::AlreadyTracked;
        }

        let attached_to = self.link_upward(account, &target);
        if path.is_root() {
            let adopted = self.adopt_top_level(&target);
            debug!(key = %target.key(), adopted, "root linked over top-level nodes");
        }
        debug!(key = %target.key(), attached_to = %attached_to, "registered path");
        Registration::Inserted {
            key: target.key().clone(),
            attached_to,
        }
    }

    /// Link a freshly indexed node into its account's tree.
    ///
    /// Returns the path of the ancestor the chain was attached to.
    fn link_upward(&self, account: &AccountName, target: &NodeRef<V>) -> RemotePath {
        let mut current = Arc::clone(target);
        while let Some(parent_path) = current.path().parent() {
            let parent_key = NodeKey::build(account, &parent_path);
            if let Some(existing) = self.store.get(parent_key.as_str()) {
                existing.add_child(&current);
                return parent_path;
            }
            if parent_path.is_root() {
                break;
            }

            let placeholder = Node::placeholder(account.clone(), parent_path);
            placeholder.add_child(&current);
            if let Some(winner) = self
                .store
                .insert_if_absent(parent_key.as_str(), Arc::clone(&placeholder))
            {
                // Our placeholder was never indexed; the chain continues from
                // the one another caller stored first.
                warn!(key = %parent_key, "placeholder raced, linking onto existing node");
                winner.add_child(&current);
                return winner.path().clone();
            }
            debug!(key = %parent_key, "synthesized placeholder");
            current = placeholder;
        }
        RemotePath::root()
    }

    /// Link the account's unparented top-level nodes under a freshly indexed
    /// root. Chains registered before the root stop short of it.
    fn adopt_top_level(&self, root: &NodeRef<V>) -> usize {
        let account = root.account();
        let mut adopted = 0;
        for key in self.store.keys() {
            if !key.starts_with(account.as_str()) {
                continue;
            }
            let Some(node) = self.store.get(&key) else {
                continue;
            };
            if node.account() == account && node.path().depth() == 1 && node.parent().is_none() {
                root.add_child(&node);
                adopted += 1;
            }
        }
        adopted
    }

    /// Whether `account` still indexes a node directly below the root.
    fn has_top_level(&self, account: &AccountName) -> bool {
        self.store.any(&mut |key, node| {
            key.starts_with(account.as_str())
                && node.account() == account
                && node.path().depth() == 1
        })
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    /// Drop the payload of `path`, removing the node if it has no children.
    ///
    /// Returns `None` if the path is untracked, or if the node survives as a
    /// placeholder because something below it is still tracked. When the
    /// node is removed, the outcome carries the payload it held and the
    /// unlink point, as for [`unregister`](Self::unregister).
    pub fn clear_payload(&self, account: &AccountName, path: &RemotePath) -> Option<Removal<V>> {
        let key = NodeKey::build(account, path);
        let node = self.store.get(key.as_str())?;
        let payload = node.take_payload();
        if node.has_children() {
            debug!(key = %key, "payload cleared, node kept as placeholder");
            return None;
        }

        self.store
            .remove_if(key.as_str(), &mut |stored| Arc::ptr_eq(stored, &node))?;
        let unlinked_from = self.detach(&node);
        Some(Removal {
            payload,
            unlinked_from,
        })
    }

    /// Stop tracking `path` and everything below it.
    ///
    /// The node is removed regardless of its payload or children; all its
    /// descendants are evicted with it, so unregistering an explicitly
    /// registered root clears the whole account. Ancestors left empty are
    /// pruned upward. Returns `None` if the path was not tracked.
    pub fn unregister(&self, account: &AccountName, path: &RemotePath) -> Option<Removal<V>> {
        let key = NodeKey::build(account, path);
        let removed = self.store.remove(key.as_str())?;
        let payload = removed.take_payload();
        let unlinked_from = self.detach(&removed);
        Some(Removal {
            payload,
            unlinked_from,
        })
    }

    /// Evict the subtree of an already removed node and prune upward.
    ///
    /// Returns the path of the first ancestor that stays indexed, or the root
    /// when pruning reached the top while other top-level nodes of the
    /// account remain.
    fn detach(&self, removed: &NodeRef<V>) -> Option<RemotePath> {
        let evicted = self.evict_descendants(removed);

        let mut child = Arc::clone(removed);
        let mut parent = child.parent();
        let mut pruned = 0usize;
        while let Some(ancestor) = parent {
            ancestor.remove_child(&child);
            if !self.prune(&ancestor) {
                debug!(
                    key = %removed.key(),
                    evicted,
                    pruned,
                    unlinked_from = %ancestor.path(),
                    "unregistered path"
                );
                return Some(ancestor.path().clone());
            }
            pruned += 1;
            parent = ancestor.parent();
            child = ancestor;
        }

        // `child` is now the topmost node taken out.
        if child.path().depth() == 1 && self.has_top_level(child.account()) {
            debug!(
                key = %removed.key(),
                evicted,
                pruned,
                "unregistered path, unlinked from the implicit root"
            );
            return Some(RemotePath::root());
        }
        debug!(key = %removed.key(), evicted, pruned, "unregistered path, pruned to the top");
        None
    }

    /// Remove every descendant of `root` from the store.
    fn evict_descendants(&self, root: &NodeRef<V>) -> usize {
        let mut pending = root.children();
        let mut evicted = 0;
        while let Some(node) = pending.pop() {
            if self
                .store
                .remove_if(node.key().as_str(), &mut |stored| Arc::ptr_eq(stored, &node))
                .is_some()
            {
                evicted += 1;
            }
            pending.extend(node.children());
        }
        evicted
    }

    /// Evict `node` if it has neither payload nor children.
    ///
    /// Returns `true` if the node is no longer indexed, `false` if it stays.
    fn prune(&self, node: &NodeRef<V>) -> bool {
        let key = node.key().as_str();
        loop {
            if !node.is_empty() {
                return false;
            }
            if self
                .store
                .remove_if(key, &mut |stored| Arc::ptr_eq(stored, node))
                .is_none()
            {
                // Already detached by someone else.
                return true;
            }
            if node.is_empty() {
                return true;
            }

            // A registration linked under the node between the emptiness
            // check and the eviction: put it back and check again.
            if self.store.insert_if_absent(key, Arc::clone(node)).is_some() {
                warn!(key, "pruned node was revived after its key was reused, leaving it detached");
                return true;
            }
        }
    }

    /// Drop every node of `account`.
    ///
    /// A flat sweep over the store with no tree maintenance, meant for
    /// account teardown. Registrations racing the sweep for the same account
    /// may survive it. Returns the number of nodes removed.
    pub fn purge_account(&self, account: &AccountName) -> usize {
        let removed = self
            .store
            .retain(&mut |_, node| node.account() != account);
        info!(
            account = %account,
            removed,
            remaining = self.store.len(),
            "purged account"
        );
        removed
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Whether `path` is indexed for `account`; placeholders count.
    pub fn contains(&self, account: &AccountName, path: &RemotePath) -> bool {
        self.store
            .contains_key(NodeKey::build(account, path).as_str())
    }

    /// Payload stored under `key`, `None` for placeholders and absent keys.
    pub fn lookup_key(&self, key: &NodeKey) -> Option<V> {
        self.store.get(key.as_str())?.payload()
    }

    /// Payload stored for `path` of `account`.
    pub fn lookup(&self, account: &AccountName, path: &RemotePath) -> Option<V> {
        self.lookup_key(&NodeKey::build(account, path))
    }

    /// The node indexed for `path` of `account`.
    pub fn node(&self, account: &AccountName, path: &RemotePath) -> Option<NodeRef<V>> {
        self.store.get(NodeKey::build(account, path).as_str())
    }

    /// Whether the node at `path` is a placeholder; `None` if untracked.
    pub fn is_placeholder(&self, account: &AccountName, path: &RemotePath) -> Option<bool> {
        self.node(account, path).map(|node| node.is_placeholder())
    }

    /// Sorted paths of the children linked under `path`; `None` if untracked.
    pub fn children(&self, account: &AccountName, path: &RemotePath) -> Option<Vec<RemotePath>> {
        let node = self.node(account, path)?;
        let mut paths: Vec<RemotePath> = node
            .children()
            .iter()
            .map(|child| child.path().clone())
            .collect();
        paths.sort();
        Some(paths)
    }

    /// Sorted paths currently indexed for `account`, placeholders included.
    pub fn tracked_paths(&self, account: &AccountName) -> Vec<RemotePath> {
        let mut paths: Vec<RemotePath> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(account.as_str()))
            .filter_map(|key| self.store.get(&key))
            .filter(|node| node.account() == account)
            .map(|node| node.path().clone())
            .collect();
        paths.sort();
        paths
    }
}

impl<V> Default for IndexedForest<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for IndexedForest<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedForest")
            .field("nodes", &self.store.len())
            .finish()
    }
}
