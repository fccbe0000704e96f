//! Remote path handling.
//!
//! Valid remote paths follow these rules:
//! - Must be non-empty and start with `/`
//! - Must not contain empty segments (`//`)
//! - Must not contain `.` or `..` segments
//! - Must not contain control characters
//!
//! Directory paths carry a trailing `/`; file paths do not. The parent of any
//! non-root path is always a directory path, so walking parents converges on
//! [`RemotePath::ROOT`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// An absolute path on the remote server.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath(String);

impl RemotePath {
    /// The top of the path hierarchy.
    pub const ROOT: &'static str = "/";

    /// Validate and wrap a remote path.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        validate_remote_path(&path)?;
        Ok(Self(path))
    }

    /// The root path.
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Whether the path names a directory (carries a trailing separator).
    pub fn is_directory(&self) -> bool {
        self.0.ends_with(PATH_SEPARATOR)
    }

    /// Last segment of the path, without trailing separator. Empty for root.
    pub fn name(&self) -> &str {
        let trimmed = self.0.trim_end_matches(PATH_SEPARATOR);
        match trimmed.rfind(PATH_SEPARATOR) {
            Some(idx) => &trimmed[idx + 1..],
            None => "",
        }
    }

    /// The directory containing this path, always `/`-terminated.
    ///
    /// Returns `None` only for the root.
    pub fn parent(&self) -> Option<RemotePath> {
        if self.is_root() {
            return None;
        }
        let trimmed = self.0.strip_suffix(PATH_SEPARATOR).unwrap_or(&self.0);
        let idx = trimmed.rfind(PATH_SEPARATOR)?;
        Some(Self(trimmed[..=idx].to_string()))
    }

    /// Iterate over the strict ancestors of this path, nearest first,
    /// ending with the root.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.0
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .count()
    }
}

/// Iterator over a path's ancestors, see [`RemotePath::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<RemotePath>,
}

impl Iterator for Ancestors {
    type Item = RemotePath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

fn validate_remote_path(path: &str) -> Result<(), TypeError> {
    if path.is_empty() {
        return Err(TypeError::invalid("remote path", path, "must not be empty"));
    }
    if !path.starts_with(PATH_SEPARATOR) {
        return Err(TypeError::invalid("remote path", path, "must start with '/'"));
    }
    if path.chars().any(char::is_control) {
        return Err(TypeError::invalid(
            "remote path",
            path,
            "must not contain control characters",
        ));
    }
    if path == RemotePath::ROOT {
        return Ok(());
    }

    // Skip the leading separator; a trailing one yields a final empty segment.
    let body = path[1..].strip_suffix(PATH_SEPARATOR).unwrap_or(&path[1..]);
    for segment in body.split(PATH_SEPARATOR) {
        match segment {
            "" => {
                return Err(TypeError::invalid(
                    "remote path",
                    path,
                    "must not contain empty segments",
                ))
            }
            "." | ".." => {
                return Err(TypeError::invalid(
                    "remote path",
                    path,
                    format!("must not contain {segment:?} segments"),
                ))
            }
            _ => {}
        }
    }
    Ok(())
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RemotePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RemotePath {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemotePath> for String {
    fn from(value: RemotePath) -> Self {
        value.0
    }
}

impl PartialEq<str> for RemotePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RemotePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemotePath({})", self.0)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
