use thiserror::Error;

/// Errors produced by type construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The value does not satisfy the construction contract of `what`.
    #[error("invalid {what} {value:?}: {reason}")]
    InvalidArgument {
        what: &'static str,
        value: String,
        reason: String,
    },
}

impl TypeError {
    pub(crate) fn invalid(what: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            what,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
