use serde::{Deserialize, Serialize};

/// Group declarations attached to a suite or a test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Groups {
    pub defines: Vec<MetaGroup>,
    pub run: GroupRun,
    pub dependencies: Vec<GroupDependency>,
}

impl Groups {
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty() && self.run.is_empty() && self.dependencies.is_empty()
    }

    /// Look up a meta-group by name.
    pub fn define(&self, name: &str) -> Option<&MetaGroup> {
        self.defines.iter().find(|d| d.name == name)
    }

    /// All groups `group` depends on, across every declaration of it.
    pub fn depends_on(&self, group: &str) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter(|d| d.name == group)
            .flat_map(|d| d.depends_on.iter().map(String::as_str))
            .collect()
    }

    /// Fold another `<groups>` block into this one.
    pub fn merge(&mut self, other: Groups) {
        self.defines.extend(other.defines);
        self.run.include.extend(other.run.include);
        self.run.exclude.extend(other.run.exclude);
        self.dependencies.extend(other.dependencies);
    }
}

/// A named alias expanding to literal group names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaGroup {
    pub name: String,
    pub includes: Vec<String>,
}

/// Group filters from a `<run>` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupRun {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl GroupRun {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// `depends-on` edges of one group. Targets are not checked for existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDependency {
    pub name: String,
    pub depends_on: Vec<String>,
}

impl GroupDependency {
    /// Split a raw `depends-on` value into individual edges.
    pub fn parse(name: impl Into<String>, raw: &str) -> Self {
        Self {
            name: name.into(),
            depends_on: raw.split_whitespace().map(String::from).collect(),
        }
    }
}
