//! Parsing and validation for rewire.toml configuration files

use crate::engine::TraversalFilter;
use crate::error::{ConfigError, RuleError};
use crate::rules::{RuleDefinition, RuleSet, ScopeDefinition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "rewire.toml";

/// Main configuration struct for rewire.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Migration metadata and traversal settings
    pub rewire: RewireMeta,

    /// Global rules, applied to every file in order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,

    /// Location-scoped rules, first match wins
    #[serde(default)]
    pub scopes: Vec<ScopeDefinition>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rewire.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.rewire.version
            )));
        }

        let scoped: usize = self.scopes.iter().map(|s| s.rules.len()).sum();
        if self.rules.is_empty() && scoped == 0 {
            return Err(ConfigError::Validation(
                "No rules configured. Add [[rules]] or [[scopes]] entries to rewire.toml."
                    .to_string(),
            ));
        }

        for scope in &self.scopes {
            globset::Glob::new(scope.location.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid scope location glob '{}': {}",
                    scope.location, e
                ))
            })?;

            if scope.rules.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Scope '{}' has no rules",
                    scope.location
                )));
            }
        }

        for ext in &self.rewire.extensions {
            if ext.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "Invalid extension '{}': extensions cannot contain path separators",
                    ext
                )));
            }
        }

        Ok(())
    }

    /// Traversal filter described by the `[rewire]` section
    pub fn filter(&self) -> TraversalFilter {
        TraversalFilter::from_lists(&self.rewire.extensions, &self.rewire.exclude_dirs)
            .respect_gitignore(self.rewire.gitignore)
    }

    /// Compile every rule table
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError`, naming the table and rule index.
    pub fn build_rules(&self) -> Result<RuleSet, RuleError> {
        RuleSet::from_definitions(&self.rules, &self.scopes)
    }

    /// Migration root, resolved against the directory holding the config
    pub fn resolve_root(&self, config_dir: &Path) -> PathBuf {
        if self.rewire.root.is_absolute() {
            self.rewire.root.clone()
        } else {
            config_dir.join(&self.rewire.root)
        }
    }
}

/// `[rewire]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewireMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// Directory to migrate, relative to the configuration file
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions to rewrite (empty means every file)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Directory names pruned from the walk
    #[serde(default)]
    pub exclude_dirs: Vec<String>,

    /// Honor .gitignore files
    #[serde(default)]
    pub gitignore: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
[rewire]
version = "1"
root = "lib"
extensions = ["dart"]
exclude_dirs = ["build", ".dart_tool", "generated"]

[[rules]]
pattern = 'ApiService\.login\('
replacement = "AuthRoutes.login("

[[rules]]
pattern = "import '../../services/api_service.dart';"
replacement = "import '../../providers/api_routes/auth_routes.dart';"
literal = true

[[scopes]]
location = "screens/staff/tabs/**"

[[scopes.rules]]
pattern = "import '../../../services/api_service.dart';"
replacement = "import '../../../providers/api_routes/property_routes.dart';"
literal = true

[output]
format = "jsonl"
color = "never"
"#;

    #[test]
    fn test_valid_config_parsing() {
        let config = Config::parse(VALID_CONFIG).unwrap();

        assert_eq!(config.rewire.version, "1");
        assert_eq!(config.rewire.root, PathBuf::from("lib"));
        assert_eq!(config.rewire.extensions, vec!["dart"]);
        assert_eq!(config.rewire.exclude_dirs.len(), 3);
        assert!(!config.rewire.gitignore);

        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].pattern, r"ApiService\.login\(");
        assert!(!config.rules[0].literal);
        assert!(config.rules[1].literal);

        assert_eq!(config.scopes.len(), 1);
        assert_eq!(config.scopes[0].location.as_str(), "screens/staff/tabs/**");
        assert_eq!(config.scopes[0].rules.len(), 1);

        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.output.color, ColorOption::Never);
    }

    #[test]
    fn test_minimal_config() {
        let minimal = r#"
[rewire]
version = "1"

[[rules]]
pattern = "a"
replacement = "b"
"#;

        let config = Config::parse(minimal).unwrap();
        assert_eq!(config.rewire.root, PathBuf::from("."));
        assert!(config.rewire.extensions.is_empty());
        assert!(config.scopes.is_empty());
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_version() {
        let invalid = r#"
[rewire]
version = "2"

[[rules]]
pattern = "a"
replacement = "b"
"#;

        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version"));
    }

    #[test]
    fn test_missing_version() {
        let invalid = r#"
[rewire]
root = "lib"
"#;

        assert!(matches!(
            Config::parse(invalid),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_no_rules() {
        let invalid = r#"
[rewire]
version = "1"
"#;

        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("No rules configured"));
    }

    #[test]
    fn test_invalid_scope_glob() {
        let invalid = r#"
[rewire]
version = "1"

[[scopes]]
location = "screens/[auth"

[[scopes.rules]]
pattern = "a"
replacement = "b"
"#;

        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Invalid scope location glob"));
    }

    #[test]
    fn test_empty_scope_rejected() {
        let invalid = r#"
[rewire]
version = "1"

[[rules]]
pattern = "a"
replacement = "b"

[[scopes]]
location = "auth/**"
"#;

        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Scope 'auth/**' has no rules"));
    }

    #[test]
    fn test_extension_with_separator_rejected() {
        let invalid = r#"
[rewire]
version = "1"
extensions = ["lib/dart"]

[[rules]]
pattern = "a"
replacement = "b"
"#;

        assert!(Config::parse(invalid).is_err());
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let misspelled_meta = r#"
[rewire]
version = "1"
exclude_dir = ["build"]

[[rules]]
pattern = "a"
replacement = "b"
"#;
        let err = Config::parse(misspelled_meta).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("exclude_dir"));

        let misspelled_scope = r#"
[rewire]
version = "1"

[[scopes]]
locaton = "auth/**"

[[scopes.rules]]
pattern = "a"
replacement = "b"
"#;
        assert!(matches!(
            Config::parse(misspelled_scope),
            Err(ConfigError::Parse(_))
        ));

        let misspelled_output = r#"
[rewire]
version = "1"

[[rules]]
pattern = "a"
replacement = "b"

[output]
colour = "never"
"#;
        assert!(matches!(
            Config::parse(misspelled_output),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rule_missing_replacement() {
        let invalid = r#"
[rewire]
version = "1"

[[rules]]
pattern = "a"
"#;

        assert!(matches!(
            Config::parse(invalid),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_pattern_surfaces_at_build() {
        let config = Config::parse(
            r#"
[rewire]
version = "1"

[[rules]]
pattern = "fine"
replacement = "ok"

[[rules]]
pattern = "(unclosed"
replacement = "x"
"#,
        )
        .unwrap();

        match config.build_rules() {
            Err(RuleError::Compilation { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected compilation error, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_from_config() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let filter = config.filter();
        assert!(filter.includes_file(Path::new("a.dart")));
        assert!(!filter.includes_file(Path::new("a.yaml")));
        assert!(filter.exclude_dir_names().contains(".dart_tool"));
    }

    #[test]
    fn test_resolve_root() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        assert_eq!(
            config.resolve_root(Path::new("/work/app")),
            PathBuf::from("/work/app/lib")
        );
    }

    #[test]
    fn test_build_rules_counts() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let rules = config.build_rules().unwrap();
        assert_eq!(rules.global().len(), 2);
        assert_eq!(rules.scopes().len(), 1);
        assert_eq!(rules.len(), 3);
    }
}
