/// Errors from store construction.
///
/// Store operations themselves are infallible; only building a backend from
/// an invalid configuration can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Sharded backends need a shard amount that is a power of two above one.
    #[error("invalid shard amount {0}: must be a power of two greater than 1")]
    InvalidShardAmount(usize),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
