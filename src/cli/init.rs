//! Initialize a rewire project
//!
//! Writes a starter rewire.toml that documents every section.

use std::fs;
use std::path::Path;

/// Default content for rewire.toml
pub(crate) const DEFAULT_REWIRE_TOML: &str = r#"[rewire]
version = "1"

# Directory to migrate, relative to this file
root = "."

# Only files with these extensions are rewritten (empty means every file)
extensions = ["dart"]

# Directory names skipped wherever they appear
exclude_dirs = ["build", ".dart_tool", "generated"]

# Honor .gitignore files
gitignore = false

# Global rules run in order on every file. Each rule sees the output of
# the previous one.
[[rules]]
pattern = 'ApiService\.login\('
replacement = "AuthRoutes.login("

# literal = true matches the pattern text exactly and inserts the
# replacement verbatim
[[rules]]
pattern = "import '../services/api_service.dart';"
replacement = "import '../providers/api_routes/auth_routes.dart';"
literal = true

# Scoped rules run before the global rules on files whose path, relative
# to root, matches the location glob. The first matching scope wins.
# [[scopes]]
# location = "screens/staff/tabs/**"
#
# [[scopes.rules]]
# pattern = "import '../../../services/api_service.dart';"
# replacement = "import '../../../providers/api_routes/property_routes.dart';"
# literal = true

[output]
format = "human"
"#;

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result of init command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitResult {
    /// Files that were created
    pub created: Vec<String>,
    /// Files that were skipped (already existed)
    pub skipped: Vec<String>,
    /// Files that were overwritten
    pub overwritten: Vec<String>,
}

/// Run the init command
///
/// # Arguments
/// * `config` - Where to write the configuration
/// * `force` - If true, overwrite an existing file. If false, skip it.
pub fn run_init(config: &Path, force: bool) -> Result<InitResult, InitError> {
    let mut result = InitResult::default();

    if let Some(parent) = config.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err(InitError::Path(format!(
            "Directory '{}' does not exist",
            parent.display()
        )));
    }

    handle_file(config, DEFAULT_REWIRE_TOML, force, &mut result)?;
    Ok(result)
}

/// Handle creation of a single file
fn handle_file(
    path: &Path,
    content: &str,
    force: bool,
    result: &mut InitResult,
) -> Result<(), InitError> {
    let path_str = path_to_string(path)?;

    if path.is_dir() {
        return Err(InitError::Path(format!(
            "Path '{}' is a directory",
            path_str
        )));
    }

    if path.exists() {
        if force {
            fs::write(path, content)?;
            result.overwritten.push(path_str);
        } else {
            result.skipped.push(path_str);
        }
    } else {
        fs::write(path, content)?;
        result.created.push(path_str);
    }

    Ok(())
}

/// Convert a path to a string representation
fn path_to_string(path: &Path) -> Result<String, InitError> {
    path.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| InitError::Path(format!("Invalid UTF-8 in path: {:?}", path)))
}
