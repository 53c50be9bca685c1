//! List command implementation
//!
//! Loads rewire.toml, compiles every rule table and prints the rules in
//! the order they are applied. No files are read.

use crate::cli::args::OutputFormat;
use crate::cli::common::{EXIT_ERROR, EXIT_PARSE_ERROR, EXIT_SUCCESS, load_config};
use crate::error::{ConfigError, RuleError};
use crate::output::{RuleListing, RuleListingHumanFormatter, RuleListingJsonlFormatter};
use std::path::Path;

/// Error type specific to list command
#[derive(Debug, thiserror::Error)]
enum ListError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error (missing configuration or invalid rule)
/// - 3: Invalid TOML configuration
pub fn run_list(config: &Path, format: OutputFormat) -> i32 {
    match run_list_inner(config) {
        Ok(listings) => {
            match format {
                OutputFormat::Human => RuleListingHumanFormatter::new().write_to_stdout(&listings),
                OutputFormat::Jsonl => RuleListingJsonlFormatter::new().write_to_stdout(&listings),
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                ListError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
                _ => EXIT_ERROR,
            }
        }
    }
}

fn run_list_inner(config: &Path) -> Result<Vec<RuleListing>, ListError> {
    let config = load_config(config)?;
    let rules = config.build_rules()?;
    Ok(RuleListing::collect(&rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rewire.toml");
        fs::write(
            &path,
            r#"
[rewire]
version = "1"

[[rules]]
pattern = "a"
replacement = "b"

[[scopes]]
location = "auth/**"

[[scopes.rules]]
pattern = "c"
replacement = "d"
"#,
        )
        .unwrap();

        let listings = run_list_inner(&path).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].pattern, "c");
        assert_eq!(listings[1].pattern, "a");
        assert_eq!(run_list(&path, OutputFormat::Jsonl), EXIT_SUCCESS);
    }

    #[test]
    fn test_list_invalid_rule() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rewire.toml");
        fs::write(
            &path,
            r#"
[rewire]
version = "1"

[[rules]]
pattern = "(a"
replacement = "b"
"#,
        )
        .unwrap();

        assert!(matches!(run_list_inner(&path), Err(ListError::Rule(_))));
        assert_eq!(run_list(&path, OutputFormat::Human), EXIT_ERROR);
    }

    #[test]
    fn test_list_missing_config() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            run_list(&temp.path().join("rewire.toml"), OutputFormat::Human),
            EXIT_ERROR
        );
    }
}
