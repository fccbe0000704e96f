//! Concurrent indexed forest of in-flight transfers.
//!
//! Tracks which folders of which account have a download, upload or sync
//! pending somewhere below them. Each account owns a tree mirroring the
//! remote hierarchy; all trees live in one flat, key-indexed store.
//!
//! # Key Types
//!
//! - [`IndexedForest`] -- The forest: register, clear, unregister, purge
//! - [`Registration`] -- Outcome of registering a path (attachment point)
//! - [`Removal`] -- Outcome of removing a path (payload and unlink point)
//! - [`ForestConfig`] -- Store backend selection and sizing
//! - [`ForestError`] -- Construction errors
//!
//! # Consistency
//!
//! Every single-key step is atomic, but the composite walks (linking a new
//! chain upward, pruning empty ancestors) are not. Concurrent callers may
//! observe a chain half-built or half-pruned. A node left pointing at an
//! evicted parent is cleaned up by the next removal that walks through it.
//! Account purges give no guarantee against concurrent activity on the same
//! account; callers serialize teardown themselves when they need one.

pub mod config;
pub mod error;
pub mod forest;
pub mod node;
pub mod outcome;

pub use config::ForestConfig;
pub use error::{ForestError, ForestResult};
pub use forest::IndexedForest;
pub use node::Node;
pub use outcome::{Registration, Removal};

pub use transit_store::StoreBackend;
pub use transit_types::{AccountName, NodeKey, RemotePath, TypeError};
