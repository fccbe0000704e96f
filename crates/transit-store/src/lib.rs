//! Atomic key-value storage for the transit forest.
//!
//! The forest keeps every node in one flat, string-keyed map. This crate
//! provides that map behind the [`AtomicStore`] trait, so the tree
//! algorithms only ever rely on single-key atomicity.
//!
//! # Storage Backends
//!
//! - [`ShardedStore`] -- `DashMap`-based store, one lock per shard
//! - [`LockedStore`] -- `HashMap` behind a single `RwLock`
//!
//! [`StoreBackend`] selects one of them from configuration.
//!
//! # Design Rules
//!
//! 1. `insert_if_absent`, `get` and `remove` are each atomic for their key.
//! 2. No operation spanning several keys is atomic; callers composing them
//!    must tolerate interleaving.
//! 3. Values are cloned out on read; store cheap handles such as `Arc`.

pub mod backend;
pub mod error;
pub mod locked;
pub mod sharded;
pub mod traits;

pub use backend::StoreBackend;
pub use error::{StoreError, StoreResult};
pub use locked::LockedStore;
pub use sharded::ShardedStore;
pub use traits::AtomicStore;
