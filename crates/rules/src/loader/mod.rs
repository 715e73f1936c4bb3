//! Filesystem loader for rule documents.
//!
//! Scans the rules directory for YAML files, parses each one via two-pass
//! deserialization (RuleEnvelope -> RuleDocument) and keeps at most one
//! enabled document per kind.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{load_rules_dir, RuleLoader, RuleSet};
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
