#![forbid(unsafe_code)]

//! Ordered rule tables
//!
//! A table is a left fold over its rules: each rule replaces every match in
//! the output of the rule before it. Later rules therefore see (and may
//! rewrite again) text produced by earlier ones.

use crate::error::RuleError;
use crate::rules::rule::{Rule, RuleDefinition};
use std::borrow::Cow;

/// Result of running content through one or more rule tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Content after the last rule
    pub content: String,
    /// Total number of substitutions performed
    pub replacements: usize,
}

/// An ordered, immutable collection of compiled rules
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Compile a table from definitions, preserving their order
    ///
    /// `name` identifies the table in error messages and listings.
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError::Compilation`, naming the failing index.
    pub fn new(name: impl Into<String>, defs: &[RuleDefinition]) -> Result<Self, RuleError> {
        let name = name.into();
        let rules = defs
            .iter()
            .enumerate()
            .map(|(index, def)| Rule::compile(def, &name, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, rules })
    }

    /// A table with no rules
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order and report whether the content changed
    ///
    /// `changed` compares the final text with the input by value, so a rule
    /// that rewrites text to itself does not count as a change.
    pub fn apply(&self, content: &str) -> (String, bool) {
        let rewrite = self.apply_counted(content);
        let changed = rewrite.content != content;
        (rewrite.content, changed)
    }

    /// Apply every rule in order, counting substitutions
    pub fn apply_counted(&self, content: &str) -> Rewrite {
        let (content, replacements) = self.fold(Cow::Borrowed(content));
        Rewrite {
            content: content.into_owned(),
            replacements,
        }
    }

    pub(crate) fn fold<'c>(&self, mut current: Cow<'c, str>) -> (Cow<'c, str>, usize) {
        let mut replacements = 0;
        for rule in &self.rules {
            let (next, count) = rule.apply(&current);
            if count > 0 {
                let next = next.into_owned();
                current = Cow::Owned(next);
                replacements += count;
            }
        }
        (current, replacements)
    }
}
