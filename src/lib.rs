#![forbid(unsafe_code)]

//! Rewire: rule-driven migration of references across a source tree
//!
//! Rewire walks a directory, rewrites import paths and call sites with an
//! ordered table of pattern rules, and writes changed files back atomically.
//! Runs report every file as changed, unchanged or failed; one bad file
//! never stops the rest of the tree from being migrated.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, DiscoveryError, FileError, RewireError, RuleError};

// Re-export core domain types for convenient access
pub use engine::{RunReport, TraversalFilter, WriteBackCoordinator, migrate};
pub use rules::{RuleDefinition, RuleSet, RuleTable};
pub use types::{GlobPattern, RelPath};
