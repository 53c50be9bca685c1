//! Error types for Rewire
//!
//! Errors are split by how far they propagate. Configuration, rule and
//! discovery errors abort a run before any file is written. Per-file errors
//! (`FileError`) never abort a run; they are recorded in the run report.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Rule-related errors, raised while a rule table is being built
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule failed to compile; `index` is its position within `table`
    #[error("Rule {index} in {table} ('{pattern}') is invalid: {message}")]
    Compilation {
        table: String,
        index: usize,
        pattern: String,
        message: String,
    },

    /// Invalid scope location glob
    #[error("Invalid scope location '{location}': {message}")]
    InvalidLocation { location: String, message: String },
}

/// Errors raised while discovering files under a root directory
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Root directory does not exist
    #[error("Root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Root exists but is not a directory
    #[error("Root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Root exists but cannot be listed
    #[error("Root directory is not readable: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An entry below the root could not be visited
    #[error("Walk error: {source}")]
    Walk {
        path: Option<PathBuf>,
        source: ignore::Error,
    },
}

/// Errors scoped to a single file; recorded in the report, never fatal
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// File could not be read
    #[error("read failed: {0}")]
    Read(std::io::Error),

    /// File content is not valid UTF-8
    #[error("not valid UTF-8 (invalid byte sequence at offset {offset})")]
    Decode { offset: usize },

    /// Rewritten content could not be committed
    #[error("write failed: {0}")]
    Write(std::io::Error),

    /// Entry could not be visited during discovery
    #[error("discovery failed: {0}")]
    Discovery(String),
}

impl FileError {
    /// Short stable label used by machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::Read(_) => "read",
            FileError::Decode { .. } => "decode",
            FileError::Write(_) => "write",
            FileError::Discovery(_) => "discovery",
        }
    }
}

/// Top-level error type for Rewire
#[derive(Debug, thiserror::Error)]
pub enum RewireError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Discovery error
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
