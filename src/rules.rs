#![forbid(unsafe_code)]

//! Rewrite rules, rule tables and location scopes

mod registry;
mod rule;
mod table;

pub use registry::{GLOBAL_TABLE, ResolvedRules, RuleSet, Scope, ScopeDefinition};
pub use rule::{Rule, RuleDefinition};
pub use table::{Rewrite, RuleTable};
