use serde::{Deserialize, Serialize};

use super::{FailurePolicy, Groups, MethodSelector, PackageFilter, ParallelMode, Parameters, Test};

pub const DEFAULT_VERBOSE: i32 = 1;
pub const DEFAULT_THREAD_COUNT: i32 = 5;
pub const DEFAULT_DATA_PROVIDER_THREAD_COUNT: i32 = 10;

/// Top-level named collection of tests plus suite-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    /// The document this suite was read from, when known.
    pub file_name: Option<String>,
    pub verbose: i32,
    pub parallel: ParallelMode,
    pub thread_count: i32,
    pub data_provider_thread_count: i32,
    pub time_out: Option<i64>,
    pub parent_module: Option<String>,
    pub guice_stage: Option<String>,
    /// Opaque identifier of the object factory; instantiation is left to the caller.
    pub object_factory: Option<String>,
    pub junit: bool,
    pub preserve_order: bool,
    pub group_by_instances: bool,
    pub skip_failed_invocation_counts: bool,
    pub allow_return_values: bool,
    pub config_failure_policy: FailurePolicy,
    pub tests: Vec<Test>,
    pub suite_files: Vec<String>,
    pub parameters: Parameters,
    pub groups: Groups,
    pub packages: Vec<PackageFilter>,
    pub method_selectors: Vec<MethodSelector>,
    pub listeners: Vec<String>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            verbose: DEFAULT_VERBOSE,
            parallel: ParallelMode::default(),
            thread_count: DEFAULT_THREAD_COUNT,
            data_provider_thread_count: DEFAULT_DATA_PROVIDER_THREAD_COUNT,
            time_out: None,
            parent_module: None,
            guice_stage: None,
            object_factory: None,
            junit: false,
            preserve_order: true,
            group_by_instances: false,
            skip_failed_invocation_counts: false,
            allow_return_values: false,
            config_failure_policy: FailurePolicy::default(),
            tests: Vec::new(),
            suite_files: Vec::new(),
            parameters: Parameters::new(),
            groups: Groups::default(),
            packages: Vec::new(),
            method_selectors: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn test(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}
