//! Results reported by forest mutations.
//!
//! The forest only reports *where* in a tree a change happened; reacting to
//! it (refreshing a folder view, notifying a sync) is up to the caller.

use serde::{Deserialize, Serialize};

use transit_types::{NodeKey, RemotePath};

/// Outcome of [`IndexedForest::register`](crate::IndexedForest::register).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Registration {
    /// A new node was indexed.
    Inserted {
        /// Key of the new node.
        key: NodeKey,
        /// Pre-existing ancestor the new chain was linked onto, or the root
        /// if no tracked ancestor was met.
        attached_to: RemotePath,
    },
    /// A node already existed at the path; nothing changed.
    AlreadyTracked,
}

impl Registration {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }

    pub fn key(&self) -> Option<&NodeKey> {
        match self {
            Self::Inserted { key, .. } => Some(key),
            Self::AlreadyTracked => None,
        }
    }

    pub fn attached_to(&self) -> Option<&RemotePath> {
        match self {
            Self::Inserted { attached_to, .. } => Some(attached_to),
            Self::AlreadyTracked => None,
        }
    }
}

/// Outcome of a removal that actually evicted a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal<V> {
    /// Payload the node carried before removal.
    pub payload: Option<V>,
    /// Nearest ancestor that survived the upward pruning, `None` if pruning
    /// went all the way up.
    pub unlinked_from: Option<RemotePath>,
}
