use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Parameters;

/// A reference to a test class by fully-qualified name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRef {
    /// Creation order within the owning test.
    pub index: usize,
    pub name: String,
    pub parameters: Parameters,
    pub included_methods: Vec<MethodInclude>,
    pub excluded_methods: BTreeSet<String>,
}

impl ClassRef {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            index,
            name: name.into(),
            parameters: Parameters::new(),
            included_methods: Vec::new(),
            excluded_methods: BTreeSet::new(),
        }
    }

    pub fn include(&self, name: &str) -> Option<&MethodInclude> {
        self.included_methods.iter().find(|m| m.name == name)
    }
}

/// An `<include>` rule for one method of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInclude {
    pub index: usize,
    pub name: String,
    /// Empty means "every invocation".
    pub invocation_numbers: Vec<i32>,
    pub parameters: Parameters,
    pub description: Option<String>,
}
