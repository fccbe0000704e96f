//! Error types for the forest crate.

use transit_store::StoreError;
use transit_types::TypeError;

/// Errors that can occur while building or addressing a forest.
///
/// Tree operations themselves never fail: operating on an untracked path
/// yields an empty outcome, not an error.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// An account name, path or key violated its construction contract.
    #[error(transparent)]
    InvalidArgument(#[from] TypeError),

    /// The configuration is inconsistent.
    #[error("invalid forest configuration: {0}")]
    Config(String),

    /// The store backend could not be opened.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for forest results.
pub type ForestResult<T> = Result<T, ForestError>;
