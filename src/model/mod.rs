//! The in-memory object graph produced by the suite parser.
//!
//! Ownership is strictly hierarchical: a [`Suite`] owns its [`Test`]s, a
//! [`Test`] owns its [`ClassRef`]s and so on. Cross references between groups
//! are by name only and are resolved by whoever consumes the graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod class;
pub mod groups;
pub mod selector;
pub mod suite;

pub use class::{ClassRef, MethodInclude};
pub use groups::{GroupDependency, GroupRun, Groups, MetaGroup};
pub use selector::{MethodSelector, PackageFilter, Script};
pub use suite::Suite;
pub use test::Test;

/// Parameter map shared by every scope that can carry `<parameter>` tags.
pub type Parameters = BTreeMap<String, String>;

/// How a suite or test asks to be run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallelMode {
    #[default]
    None,
    Methods,
    Tests,
    Classes,
    Instances,
}

impl ParallelMode {
    /// Parse an attribute value. `true`/`false` are legacy spellings.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "false" => Some(Self::None),
            "methods" | "true" => Some(Self::Methods),
            "tests" => Some(Self::Tests),
            "classes" => Some(Self::Classes),
            "instances" => Some(Self::Instances),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Methods => "methods",
            Self::Tests => "tests",
            Self::Classes => "classes",
            Self::Instances => "instances",
        }
    }
}

impl fmt::Display for ParallelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with the remaining configuration methods after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Skip,
    Continue,
}

impl FailurePolicy {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "continue" => Some(Self::Continue),
            _ => None,
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Continue => f.write_str("continue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_mode_accepts_legacy_spellings() {
        assert_eq!(ParallelMode::from_attr("true"), Some(ParallelMode::Methods));
        assert_eq!(ParallelMode::from_attr("false"), Some(ParallelMode::None));
        assert_eq!(ParallelMode::from_attr("Classes"), Some(ParallelMode::Classes));
        assert_eq!(ParallelMode::from_attr("sideways"), None);
    }

    #[test]
    fn test_failure_policy() {
        assert_eq!(FailurePolicy::from_attr("continue"), Some(FailurePolicy::Continue));
        assert_eq!(FailurePolicy::from_attr("retry"), None);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Skip);
    }
}
