use serde::{Deserialize, Serialize};

/// Pluggable method inclusion rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MethodSelector {
    /// A selector implementation referenced by class name.
    Class { name: String, priority: i32 },
    /// An inline scripted expression.
    Script(Script),
}

/// An inline script body together with its language tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub language: Option<String>,
    pub expression: String,
}

/// A `<package>` declaration with its own include/exclude name patterns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageFilter {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PackageFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
