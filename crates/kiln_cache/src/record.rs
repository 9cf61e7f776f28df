//! The per-source-file cache record.

use std::collections::BTreeSet;

use kiln_common::{RelativePath, Timestamp};
use kiln_diagnostics::CompilerIssue;
use serde::{Deserialize, Serialize};

/// Cached state for a single source file.
///
/// `dependencies == None` means dependency information has never been
/// computed for this file, which is different from `Some` of an empty set
/// (the file is known to depend on nothing).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileRecord {
    /// Path relative to the source folder.
    pub path: RelativePath,

    /// Modification time of the source when it was last compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// Source files this file depends on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeSet<RelativePath>>,

    /// Issues the compiler reported for this file on its last compile.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<CompilerIssue>,
}

impl SourceFileRecord {
    /// Creates a record with no timestamp, unknown dependencies, and no issues.
    pub fn new(path: RelativePath) -> Self {
        Self {
            path,
            last_modified: None,
            dependencies: None,
            issues: Vec::new(),
        }
    }

    /// Sets the recorded modification time.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the recorded dependencies.
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = RelativePath>) -> Self {
        self.dependencies = Some(dependencies.into_iter().collect());
        self
    }

    /// Sets the recorded issues.
    pub fn with_issues(mut self, issues: Vec<CompilerIssue>) -> Self {
        self.issues = issues;
        self
    }

    /// Returns `true` if the last compile reported any issue.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns the number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity.is_error()).count()
    }

    /// Returns `true` if `path` is a recorded dependency.
    pub fn depends_on(&self, path: &RelativePath) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|deps| deps.contains(path))
    }
}
