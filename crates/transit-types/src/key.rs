use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::AccountName;
use crate::error::TypeError;
use crate::path::RemotePath;

/// Key under which a node is indexed in the store.
///
/// A key is the account name immediately followed by the remote path; no
/// separator is inserted, the path's leading `/` delimits the two. Keys of
/// one account therefore all share the account name as prefix.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeKey(String);

impl NodeKey {
    /// Build the key of `path` inside `account`'s namespace.
    pub fn build(account: &AccountName, path: &RemotePath) -> Self {
        let mut key = String::with_capacity(account.as_str().len() + path.as_str().len());
        key.push_str(account.as_str());
        key.push_str(path.as_str());
        Self(key)
    }

    /// Wrap a raw key string, e.g. one handed back by a previous registration.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TypeError::invalid("node key", &raw, "must not be empty"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeKey> for String {
    fn from(value: NodeKey) -> Self {
        value.0
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
