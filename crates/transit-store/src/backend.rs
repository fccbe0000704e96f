use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreResult;
use crate::locked::LockedStore;
use crate::sharded::ShardedStore;
use crate::traits::AtomicStore;

/// Which [`AtomicStore`] implementation to build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackend {
    /// [`ShardedStore`]; `shard_amount` overrides the `DashMap` default.
    Sharded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shard_amount: Option<usize>,
    },
    /// [`LockedStore`].
    Locked,
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::Sharded { shard_amount: None }
    }
}

impl StoreBackend {
    /// Build an empty store of this kind, pre-sized for `capacity` entries.
    pub fn open<V>(&self, capacity: usize) -> StoreResult<Box<dyn AtomicStore<V>>>
    where
        V: Clone + Send + Sync + 'static,
    {
        debug!(backend = ?self, capacity, "opening store");
        Ok(match self {
            Self::Sharded {
                shard_amount: Some(shards),
            } => Box::new(ShardedStore::with_shard_amount(capacity, *shards)?),
            Self::Sharded { shard_amount: None } => Box::new(ShardedStore::with_capacity(capacity)),
            Self::Locked => Box::new(LockedStore::with_capacity(capacity)),
        })
    }
}
