//! Foundation types for transit.
//!
//! Every identifier the forest handles is validated once, at construction,
//! so that the tree algorithms downstream never have to deal with a path that
//! has no derivable parent or with an empty key.
//!
//! # Key Types
//!
//! - [`AccountName`] -- Identifier of the account that owns a tree
//! - [`RemotePath`] -- Absolute, `/`-separated path on the remote server
//! - [`NodeKey`] -- Store key: account name concatenated with a remote path

pub mod account;
pub mod error;
pub mod key;
pub mod path;

pub use account::AccountName;
pub use error::TypeError;
pub use key::NodeKey;
pub use path::{Ancestors, RemotePath, PATH_SEPARATOR};
