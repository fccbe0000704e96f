//! Forest nodes.
//!
//! A [`Node`] stands for one path of one account. The store owns every node
//! through an `Arc`; a node owns its children the same way and points back at
//! its parent through a `Weak`, so a parent handle never proves the parent is
//! still indexed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use transit_types::{AccountName, NodeKey, RemotePath};

/// One tracked path, payload-bearing or placeholder.
pub struct Node<V> {
    key: NodeKey,
    account: AccountName,
    path: RemotePath,
    parent: Mutex<Weak<Node<V>>>,
    /// Children by key; membership never depends on node addresses.
    children: Mutex<HashMap<NodeKey, Arc<Node<V>>>>,
    payload: Mutex<Option<V>>,
}

impl<V> Node<V> {
    pub(crate) fn new(account: AccountName, path: RemotePath, payload: Option<V>) -> Arc<Self> {
        Arc::new(Self {
            key: NodeKey::build(&account, &path),
            account,
            path,
            parent: Mutex::new(Weak::new()),
            children: Mutex::new(HashMap::new()),
            payload: Mutex::new(payload),
        })
    }

    pub(crate) fn placeholder(account: AccountName, path: RemotePath) -> Arc<Self> {
        Self::new(account, path, None)
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn account(&self) -> &AccountName {
        &self.account
    }

    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    /// The node this one is linked under, if it is still alive.
    pub fn parent(&self) -> Option<Arc<Node<V>>> {
        self.parent.lock().upgrade()
    }

    /// Link `child` under this node, replacing its previous parent.
    pub(crate) fn add_child(self: &Arc<Self>, child: &Arc<Node<V>>) {
        self.children
            .lock()
            .insert(child.key.clone(), Arc::clone(child));
        *child.parent.lock() = Arc::downgrade(self);
    }

    /// Unlink `child` if it is the node currently linked under its key.
    pub(crate) fn remove_child(&self, child: &Arc<Node<V>>) -> bool {
        let mut children = self.children.lock();
        let linked = children
            .get(&child.key)
            .is_some_and(|linked| Arc::ptr_eq(linked, child));
        if linked {
            children.remove(&child.key);
        }
        linked
    }

    /// Snapshot of the current children.
    pub fn children(&self) -> Vec<Arc<Node<V>>> {
        self.children.lock().values().cloned().collect()
    }

    pub fn has_children(&self) -> bool {
        !self.children.lock().is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.payload.lock().is_none()
    }

    /// No children and no payload: the node has no reason to stay indexed.
    pub fn is_empty(&self) -> bool {
        if self.has_children() {
            return false;
        }
        self.is_placeholder()
    }

    pub(crate) fn take_payload(&self) -> Option<V> {
        self.payload.lock().take()
    }
}

impl<V: Clone> Node<V> {
    /// A clone of the payload, `None` for placeholders.
    pub fn payload(&self) -> Option<V> {
        self.payload.lock().clone()
    }
}

impl<V> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.children.lock().len();
        let placeholder = self.is_placeholder();
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("children", &children)
            .field("placeholder", &placeholder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str, payload: Option<u32>) -> Arc<Node<u32>> {
        Node::new(
            AccountName::new("A").unwrap(),
            RemotePath::new(path).unwrap(),
            payload,
        )
    }

    #[test]
    fn key_is_account_plus_path() {
        let n = node("/docs/a.txt", Some(1));
        assert_eq!(n.key().as_str(), "A/docs/a.txt");
        assert_eq!(n.path().as_str(), "/docs/a.txt");
        assert_eq!(n.account().as_str(), "A");
    }

    #[test]
    fn add_child_sets_back_link() {
        let parent = node("/docs/", None);
        let child = node("/docs/a.txt", Some(1));
        parent.add_child(&child);

        assert!(parent.has_children());
        let back = child.parent().unwrap();
        assert!(Arc::ptr_eq(&back, &parent));
    }

    #[test]
    fn parent_link_does_not_keep_parent_alive() {
        let child = node("/docs/a.txt", Some(1));
        {
            let parent = node("/docs/", None);
            parent.add_child(&child);
        }
        assert!(child.parent().is_none());
    }

    #[test]
    fn remove_child_ignores_stale_node_with_same_key() {
        let parent = node("/docs/", None);
        let first = node("/docs/a.txt", Some(1));
        let second = node("/docs/a.txt", Some(2));
        parent.add_child(&second);

        assert!(!parent.remove_child(&first));
        assert!(parent.has_children());
        assert!(parent.remove_child(&second));
        assert!(!parent.has_children());
    }

    #[test]
    fn emptiness_needs_no_children_and_no_payload() {
        let dir = node("/docs/", Some(9));
        assert!(!dir.is_empty());
        assert_eq!(dir.take_payload(), Some(9));
        assert!(dir.is_placeholder());
        assert!(dir.is_empty());

        let child = node("/docs/a.txt", None);
        dir.add_child(&child);
        assert!(!dir.is_empty());
    }

    #[test]
    fn payload_is_cleared_not_replaced() {
        let n = node("/a", Some(3));
        assert_eq!(n.payload(), Some(3));
        n.take_payload();
        assert_eq!(n.payload(), None);
        assert_eq!(n.take_payload(), None);
    }
}
