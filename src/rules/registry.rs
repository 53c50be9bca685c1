#![forbid(unsafe_code)]

//! Rule set: the global table plus location-scoped tables
//!
//! Scopes map a root-relative location glob to extra rules. Scopes are
//! checked in declaration order and the first match wins; its rules run
//! before the global table.

use crate::error::RuleError;
use crate::rules::rule::RuleDefinition;
use crate::rules::table::{Rewrite, RuleTable};
use crate::types::{GlobPattern, RelPath};
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Name given to the global rule table
pub const GLOBAL_TABLE: &str = "global rules";

/// Uncompiled scope as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeDefinition {
    /// Location glob, relative to the migration root
    pub location: GlobPattern,

    /// Rules applied to files under the location
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A location glob with the rules it contributes
#[derive(Debug, Clone)]
pub struct Scope {
    location: GlobPattern,
    matcher: GlobMatcher,
    table: RuleTable,
}

impl Scope {
    /// Compile a scope
    ///
    /// `*` does not cross `/`; use `**` to match nested directories.
    pub fn new(location: GlobPattern, table: RuleTable) -> Result<Self, RuleError> {
        let matcher = GlobBuilder::new(location.as_str())
            .literal_separator(true)
            .build()
            .map_err(|e| RuleError::InvalidLocation {
                location: location.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();
        Ok(Self {
            location,
            matcher,
            table,
        })
    }

    /// Location glob
    pub fn location(&self) -> &GlobPattern {
        &self.location
    }

    /// Rules for this scope
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Check whether a root-relative path falls under this scope
    pub fn matches(&self, path: &RelPath) -> bool {
        self.matcher.is_match(path.as_str())
    }
}

/// All rules for a run, shared read-only by every worker
#[derive(Debug, Clone)]
pub struct RuleSet {
    global: RuleTable,
    scopes: Vec<Scope>,
}

impl RuleSet {
    /// Creates a rule set with only global rules
    pub fn new(global: RuleTable) -> Self {
        Self {
            global,
            scopes: Vec::new(),
        }
    }

    /// Compile a rule set from configuration definitions
    ///
    /// # Errors
    ///
    /// Returns `RuleError` for the first invalid rule or location, before
    /// any file is touched.
    pub fn from_definitions(
        global: &[RuleDefinition],
        scopes: &[ScopeDefinition],
    ) -> Result<Self, RuleError> {
        let mut set = Self::new(RuleTable::new(GLOBAL_TABLE, global)?);
        for def in scopes {
            let name = format!("scope '{}'", def.location);
            let table = RuleTable::new(name, &def.rules)?;
            set.push_scope(Scope::new(def.location.clone(), table)?);
        }
        Ok(set)
    }

    /// Append a scope; it is checked after every scope already present
    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Global table
    pub fn global(&self) -> &RuleTable {
        &self.global
    }

    /// Scopes in declaration order
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Total number of rules across all tables
    pub fn len(&self) -> usize {
        self.global.len() + self.scopes.iter().map(|s| s.table.len()).sum::<usize>()
    }

    /// Check if there are no rules at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the rules that apply to a root-relative path
    pub fn resolve(&self, path: &RelPath) -> ResolvedRules<'_> {
        ResolvedRules {
            scope: self.scopes.iter().find(|s| s.matches(path)),
            global: &self.global,
        }
    }
}

/// Rules resolved for one file
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRules<'a> {
    scope: Option<&'a Scope>,
    global: &'a RuleTable,
}

impl<'a> ResolvedRules<'a> {
    /// Matching scope, if any
    pub fn scope(&self) -> Option<&'a Scope> {
        self.scope
    }

    /// Apply the scope's rules, then the global table
    pub fn apply_counted(&self, content: &str) -> Rewrite {
        let mut current = Cow::Borrowed(content);
        let mut replacements = 0;

        if let Some(scope) = self.scope {
            let (next, count) = scope.table.fold(current);
            current = next;
            replacements += count;
        }

        let (current, count) = self.global.fold(current);
        Rewrite {
            content: current.into_owned(),
            replacements: replacements + count,
        }
    }
}
