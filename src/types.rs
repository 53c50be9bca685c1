#![forbid(unsafe_code)]

//! Core domain types for Rewire

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A root-relative file path, normalized for matching and reporting
///
/// Paths use forward slashes, have no trailing slash or leading "./",
/// and the root itself is represented as ".".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelPath(String);

impl RelPath {
    /// Creates a new RelPath with normalization
    pub fn new(path: impl Into<String>) -> Self {
        RelPath(Self::normalize(path.into()))
    }

    /// Builds the path of `path` relative to `root`
    ///
    /// Falls back to the full path when `path` is not under `root`.
    pub fn relative_to(root: &Path, path: &Path) -> Self {
        let rel = path.strip_prefix(root).unwrap_or(path);
        Self::new(rel.to_string_lossy().into_owned())
    }

    fn normalize(mut path: String) -> String {
        path = path.replace('\\', "/");

        while path.ends_with('/') && path.len() > 1 {
            path.pop();
        }

        if path.is_empty() || path == "/" {
            return ".".to_string();
        }

        while let Some(stripped) = path.strip_prefix("./") {
            path = stripped.to_string();
        }

        if path.is_empty() {
            return ".".to_string();
        }

        path
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RelPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(RelPath::new(value))
    }
}

impl From<RelPath> for String {
    fn from(path: RelPath) -> Self {
        path.0
    }
}

/// A glob pattern for matching root-relative locations
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GlobPattern {
    fn from(pattern: String) -> Self {
        GlobPattern(pattern)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}
