use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of the account a tree of transfers belongs to.
///
/// Account names are opaque to the forest: they only need to be non-empty
/// and printable, since they become the prefix of every key in the
/// account's namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Validate and wrap an account name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::invalid("account name", &name, "must not be empty"));
        }
        if name.chars().any(char::is_control) {
            return Err(TypeError::invalid(
                "account name",
                &name,
                "must not contain control characters",
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountName({})", self.0)
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_account_names() {
        for name in ["A", "alice@cloud.example.com", "admin@host/owncloud"] {
            let account = AccountName::new(name).unwrap();
            assert_eq!(account.as_str(), name);
        }
    }

    #[test]
    fn rejects_empty_name() {
        let err = AccountName::new("").unwrap_err();
        assert!(matches!(err, TypeError::InvalidArgument { what: "account name", .. }));
    }

    #[test]
    fn rejects_control_characters() {
        assert!(AccountName::new("bob\n").is_err());
        assert!(AccountName::new("\0").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: AccountName = serde_json::from_str("\"carol\"").unwrap();
        assert_eq!(ok.to_string(), "carol");
        assert!(serde_json::from_str::<AccountName>("\"\"").is_err());
    }
}
