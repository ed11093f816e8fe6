//! Loading a suite together with the suite files it references.
//!
//! The core parser reads one document at a time. This module walks
//! `<suite-file path="...">` references, resolving each relative to the file
//! that mentions it, and parses them one after another. A file is read at
//! most once, which also breaks reference cycles.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::entity::{BundledResolver, EntityResolver};
use crate::errors::SuiteError;
use crate::model::Suite;
use crate::parser::{ParseWarning, SuiteParser};
use crate::ParseOptions;

/// One suite read while walking a suite tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedSuite {
    pub path: PathBuf,
    pub suite: Suite,
    /// Name of the suite whose document referenced this one.
    pub parent: Option<String>,
    pub warnings: Vec<ParseWarning>,
}

pub struct SuiteLoader<R: EntityResolver = BundledResolver> {
    parser: SuiteParser<R>,
}

impl SuiteLoader<BundledResolver> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parser: SuiteParser::new(options),
        }
    }
}

impl<R: EntityResolver> SuiteLoader<R> {
    pub fn with_parser(parser: SuiteParser<R>) -> Self {
        Self { parser }
    }

    /// Parse only `root`.
    pub fn load(&self, root: &Path) -> Result<Vec<LoadedSuite>, SuiteError> {
        self.walk(root, false)
    }

    /// Parse `root` and, breadth first, every suite file it references.
    pub fn load_recursive(&self, root: &Path) -> Result<Vec<LoadedSuite>, SuiteError> {
        self.walk(root, true)
    }

    fn walk(&self, root: &Path, follow: bool) -> Result<Vec<LoadedSuite>, SuiteError> {
        let mut loaded = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(root.to_path_buf(), None::<String>)]);

        while let Some((path, parent)) = queue.pop_front() {
            let key = normalize(&path);
            if !seen.insert(key) {
                tracing::debug!(path = %path.display(), "suite file already loaded, skipping");
                continue;
            }

            let doc = self.parser.parse_file(&path)?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            for suite in doc.suites {
                if follow {
                    for child in &suite.suite_files {
                        queue.push_back((base.join(child), Some(suite.name.clone())));
                    }
                }
                loaded.push(LoadedSuite {
                    path: path.clone(),
                    suite,
                    parent: parent.clone(),
                    warnings: doc.warnings.clone(),
                });
            }
        }
        Ok(loaded)
    }
}

fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
