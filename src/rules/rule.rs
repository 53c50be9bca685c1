#![forbid(unsafe_code)]

//! A single rewrite rule: a compiled pattern paired with its replacement
//!
//! Patterns use `regex` syntax unless the rule is marked `literal`, in which
//! case the pattern text is escaped and the replacement is inserted verbatim.
//! Regex replacements may reference capture groups as `$1`, `$name` or
//! `${name}`; `$$` inserts a literal dollar sign.

use crate::error::RuleError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Uncompiled rule as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    /// Pattern text (regex unless `literal` is set)
    pub pattern: String,

    /// Replacement template
    pub replacement: String,

    /// Treat both pattern and replacement as plain text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub literal: bool,
}

impl RuleDefinition {
    /// Creates a regex rule definition
    pub fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            literal: false,
        }
    }

    /// Creates a literal rule definition
    pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            literal: true,
        }
    }
}

/// A compiled, validated rewrite rule
#[derive(Clone)]
pub struct Rule {
    pattern_text: String,
    replacement: String,
    literal: bool,
    regex: Regex,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern_text)
            .field("replacement", &self.replacement)
            .field("literal", &self.literal)
            .finish()
    }
}

impl Rule {
    /// Compile a rule definition
    ///
    /// `table` and `index` identify the rule in error messages.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Compilation` if:
    /// - the pattern does not compile
    /// - the pattern can match the empty string anywhere, including
    ///   zero-width assertions such as `\b` or `$`
    /// - the replacement references a capture group the pattern lacks
    pub fn compile(def: &RuleDefinition, table: &str, index: usize) -> Result<Self, RuleError> {
        let fail = |message: String| RuleError::Compilation {
            table: table.to_string(),
            index,
            pattern: def.pattern.clone(),
            message,
        };

        let source = if def.literal {
            Cow::Owned(regex::escape(&def.pattern))
        } else {
            Cow::Borrowed(def.pattern.as_str())
        };

        let regex = Regex::new(&source).map_err(|e| fail(e.to_string()))?;

        let hir = regex_syntax::Parser::new()
            .parse(&source)
            .map_err(|e| fail(e.to_string()))?;
        if hir.properties().minimum_len() == Some(0) {
            return Err(fail(
                "pattern matches the empty string and would rewrite every position".to_string(),
            ));
        }

        if !def.literal {
            for group in group_refs(&def.replacement) {
                let known = match group {
                    GroupRef::Index(i) => i < regex.captures_len(),
                    GroupRef::Name(name) => regex.capture_names().flatten().any(|n| n == name),
                };
                if !known {
                    return Err(fail(format!(
                        "replacement '{}' references unknown capture group {}",
                        def.replacement, group
                    )));
                }
            }
        }

        Ok(Self {
            pattern_text: def.pattern.clone(),
            replacement: def.replacement.clone(),
            literal: def.literal,
            regex,
        })
    }

    /// Pattern text as written; this is the rule's identity
    pub fn pattern(&self) -> &str {
        &self.pattern_text
    }

    /// Replacement template as written
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Whether the rule is a plain-text rule
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Replace every non-overlapping match in `haystack`
    ///
    /// Returns the rewritten text and the number of matches replaced. The
    /// input is borrowed back unchanged when nothing matched.
    pub fn apply<'h>(&self, haystack: &'h str) -> (Cow<'h, str>, usize) {
        let mut out = String::new();
        let mut last = 0;
        let mut count = 0;

        if self.literal {
            for m in self.regex.find_iter(haystack) {
                out.push_str(&haystack[last..m.start()]);
                out.push_str(&self.replacement);
                last = m.end();
                count += 1;
            }
        } else {
            for caps in self.regex.captures_iter(haystack) {
                let Some(m) = caps.get(0) else {
                    continue;
                };
                out.push_str(&haystack[last..m.start()]);
                caps.expand(&self.replacement, &mut out);
                last = m.end();
                count += 1;
            }
        }

        if count == 0 {
            return (Cow::Borrowed(haystack), 0);
        }

        out.push_str(&haystack[last..]);
        (Cow::Owned(out), count)
    }
}

/// A capture group referenced from a replacement template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl std::fmt::Display for GroupRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupRef::Index(i) => write!(f, "${}", i),
            GroupRef::Name(name) => write!(f, "${{{}}}", name),
        }
    }
}

/// Collect the group references in a template, following the expansion
/// rules of `regex::Captures::expand`
fn group_refs(template: &str) -> Vec<GroupRef<'_>> {
    let bytes = template.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        match bytes.get(i + 1) {
            Some(b'$') => {
                i += 2;
            }
            Some(b'{') => {
                let start = i + 2;
                match template[start..].find('}') {
                    Some(len) => {
                        refs.push(parse_group(&template[start..start + len]));
                        i = start + len + 1;
                    }
                    None => i += 1,
                }
            }
            Some(_) => {
                let start = i + 1;
                let len = bytes[start..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                if len > 0 {
                    refs.push(parse_group(&template[start..start + len]));
                }
                i = start + len;
            }
            None => i += 1,
        }
    }

    refs
}

fn parse_group(name: &str) -> GroupRef<'_> {
    match name.parse::<usize>() {
        Ok(index) => GroupRef::Index(index),
        Err(_) => GroupRef::Name(name),
    }
}
