#![forbid(unsafe_code)]

//! Rule listing formatters for the `rewire list` command
//!
//! Tables are listed in the order a scoped file sees them: each scope in
//! priority order, then the global table.

use crate::rules::{Rule, RuleSet};
use serde::Serialize;

/// Kind of pattern a rule uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Regex,
    Literal,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Regex => "regex",
            RuleKind::Literal => "literal",
        }
    }
}

/// One compiled rule and where it lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleListing {
    pub table: String,
    pub location: Option<String>,
    pub index: usize,
    pub kind: RuleKind,
    pub pattern: String,
    pub replacement: String,
}

impl RuleListing {
    /// Flatten a rule set into listings
    pub fn collect(rules: &RuleSet) -> Vec<RuleListing> {
        let scoped = rules.scopes().iter().flat_map(|scope| {
            let location = scope.location().to_string();
            scope
                .table()
                .rules()
                .iter()
                .enumerate()
                .map(move |(index, rule)| {
                    listing(scope.table().name(), Some(location.clone()), index, rule)
                })
        });

        let global = rules
            .global()
            .rules()
            .iter()
            .enumerate()
            .map(|(index, rule)| listing(rules.global().name(), None, index, rule));

        scoped.chain(global).collect()
    }
}

fn listing(table: &str, location: Option<String>, index: usize, rule: &Rule) -> RuleListing {
    RuleListing {
        table: table.to_string(),
        location,
        index,
        kind: if rule.is_literal() {
            RuleKind::Literal
        } else {
            RuleKind::Regex
        },
        pattern: rule.pattern().to_string(),
        replacement: rule.replacement().to_string(),
    }
}

/// Human-readable formatter for rule listings
pub struct RuleListingHumanFormatter;

impl RuleListingHumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        RuleListingHumanFormatter
    }

    /// Group listings under their table name
    pub fn format(&self, listings: &[RuleListing]) -> String {
        let mut output = String::new();

        output.push_str(&format!("Rules ({} total):\n", listings.len()));

        let mut current: Option<&str> = None;
        for item in listings {
            if current != Some(item.table.as_str()) {
                output.push('\n');
                output.push_str(&format!("{}:\n", item.table));
                current = Some(item.table.as_str());
            }
            output.push_str(&format!(
                "  {}. [{}] {} -> {}\n",
                item.index,
                item.kind.as_str(),
                item.pattern,
                item.replacement
            ));
        }

        output
    }

    /// Write the formatted output to stdout
    pub fn write_to_stdout(&self, listings: &[RuleListing]) {
        print!("{}", self.format(listings));
    }
}

impl Default for RuleListingHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// JSONL output structure for a rule listing
#[derive(Debug, Serialize)]
struct JsonlRule<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    table: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    index: usize,
    kind: &'static str,
    pattern: &'a str,
    replacement: &'a str,
}

/// JSONL formatter for rule listings
pub struct RuleListingJsonlFormatter;

impl RuleListingJsonlFormatter {
    /// Create a new JSONL formatter
    pub fn new() -> Self {
        RuleListingJsonlFormatter
    }

    /// One JSON object per rule
    pub fn format(&self, listings: &[RuleListing]) -> String {
        let mut output = String::new();

        for item in listings {
            let record = JsonlRule {
                record_type: "rule",
                table: &item.table,
                location: item.location.as_deref(),
                index: item.index,
                kind: item.kind.as_str(),
                pattern: &item.pattern,
                replacement: &item.replacement,
            };

            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }

        output
    }

    /// Write the formatted output to stdout
    pub fn write_to_stdout(&self, listings: &[RuleListing]) {
        print!("{}", self.format(listings));
    }
}

impl Default for RuleListingJsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleDefinition, ScopeDefinition};
    use crate::types::GlobPattern;

    fn rule_set() -> RuleSet {
        RuleSet::from_definitions(
            &[
                RuleDefinition::regex(r"ApiService\.login\(", "AuthRoutes.login("),
                RuleDefinition::literal("api_service.dart", "auth_routes.dart"),
            ],
            &[ScopeDefinition {
                location: GlobPattern::new("screens/staff/**"),
                rules: vec![RuleDefinition::literal(
                    "api_service.dart",
                    "property_routes.dart",
                )],
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_scopes_listed_before_global() {
        let listings = RuleListing::collect(&rule_set());
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].location.as_deref(), Some("screens/staff/**"));
        assert_eq!(listings[0].kind, RuleKind::Literal);
        assert_eq!(listings[1].table, "global rules");
        assert_eq!(listings[1].index, 0);
        assert_eq!(listings[1].kind, RuleKind::Regex);
        assert_eq!(listings[2].index, 1);
    }

    #[test]
    fn test_human_format_groups_tables() {
        let output = RuleListingHumanFormatter::new().format(&RuleListing::collect(&rule_set()));
        assert!(output.starts_with("Rules (3 total):\n"));
        assert!(output.contains("scope 'screens/staff/**':\n"));
        assert!(output.contains("global rules:\n"));
        assert!(output.contains(r"  0. [regex] ApiService\.login\( -> AuthRoutes.login("));
        assert!(output.contains("  1. [literal] api_service.dart -> auth_routes.dart"));
    }

    #[test]
    fn test_jsonl_format() {
        let output = RuleListingJsonlFormatter::default().format(&RuleListing::collect(&rule_set()));
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "rule");
        assert_eq!(lines[0]["location"], "screens/staff/**");
        assert_eq!(lines[1]["table"], "global rules");
        assert!(lines[1].get("location").is_none());
        assert_eq!(lines[2]["kind"], "literal");
    }

    #[test]
    fn test_empty_listing() {
        let output = RuleListingHumanFormatter::default().format(&[]);
        assert_eq!(output, "Rules (0 total):\n");
        assert!(RuleListingJsonlFormatter::new().format(&[]).is_empty());
    }
}
