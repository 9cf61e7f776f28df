//! The outcome of a staleness check and how compiler results fold back in.

use std::collections::{BTreeMap, BTreeSet};

use kiln_common::RelativePath;
use kiln_config::ProjectManifest;
use kiln_diagnostics::CompilerIssue;

use crate::cache::BuildCache;
use crate::record::SourceFileRecord;
use crate::staleness::ChangeSet;

/// Which files to compile, and the records to persist once they are.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompilePlan {
    /// Files that must be handed to the compiler.
    pub files_to_compile: BTreeSet<RelativePath>,

    /// One record per source file on disk, sorted by path. Records of files
    /// in [`CompilePlan::files_to_compile`] are provisional until
    /// [`CompilePlan::into_cache`] fills in the compiler's results.
    pub records: Vec<SourceFileRecord>,

    /// `true` if the manifest change invalidated every cached record.
    pub manifest_changed: bool,

    /// How each file compares to the cache.
    pub changes: ChangeSet,
}

impl CompilePlan {
    /// Returns `true` if no file needs compiling.
    pub fn is_up_to_date(&self) -> bool {
        self.files_to_compile.is_empty()
    }

    /// Returns the files to compile in path order.
    pub fn sorted_files(&self) -> Vec<RelativePath> {
        self.files_to_compile.iter().cloned().collect()
    }

    /// Produces the cache to persist after compiling.
    ///
    /// Each compiled file's issues are replaced by exactly what the compiler
    /// reported for it in `issues` (none, if it has no entry). Its
    /// dependencies are replaced when `dependencies` has an entry for it and
    /// kept as planned otherwise. Records outside the compile set are left
    /// untouched, and issues for files outside it are dropped.
    pub fn into_cache(
        self,
        manifest: ProjectManifest,
        mut issues: BTreeMap<RelativePath, Vec<CompilerIssue>>,
        mut dependencies: BTreeMap<RelativePath, BTreeSet<RelativePath>>,
    ) -> BuildCache {
        let mut records = self.records;
        for record in &mut records {
            if !self.files_to_compile.contains(&record.path) {
                continue;
            }
            record.issues = issues.remove(&record.path).unwrap_or_default();
            if let Some(deps) = dependencies.remove(&record.path) {
                record.dependencies = Some(deps);
            }
        }

        for (path, dropped) in &issues {
            tracing::debug!(
                %path,
                count = dropped.len(),
                "ignoring issues for a file that was not compiled"
            );
        }

        BuildCache::with_records(manifest, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_common::Timestamp;

    fn p(path: &str) -> RelativePath {
        RelativePath::new(path)
    }

    fn plan() -> CompilePlan {
        let stamp = Timestamp::from_epoch_nanos(100);
        CompilePlan {
            files_to_compile: [p("A.java"), p("B.java")].into_iter().collect(),
            records: vec![
                SourceFileRecord::new(p("A.java"))
                    .with_last_modified(stamp)
                    .with_issues(vec![CompilerIssue::error("A.java", 1, 1, "old")]),
                SourceFileRecord::new(p("B.java"))
                    .with_last_modified(stamp)
                    .with_dependencies([p("C.java")]),
                SourceFileRecord::new(p("C.java"))
                    .with_last_modified(stamp)
                    .with_issues(vec![CompilerIssue::warning("C.java", 2, 1, "kept")]),
            ],
            manifest_changed: false,
            changes: ChangeSet::default(),
        }
    }

    #[test]
    fn compiled_issues_are_replaced() {
        let mut issues = BTreeMap::new();
        issues.insert(p("B.java"), vec![CompilerIssue::error("B.java", 3, 7, "new")]);
        let cache = plan().into_cache(ProjectManifest::default(), issues, BTreeMap::new());

        let records = cache.records();
        assert!(records[0].issues.is_empty());
        assert_eq!(records[1].issues[0].message, "new");
        assert_eq!(records[2].issues[0].message, "kept");
        assert_eq!(cache.error_count(), 1);
    }

    #[test]
    fn reported_dependencies_replace_planned_ones() {
        let mut deps = BTreeMap::new();
        deps.insert(p("A.java"), [p("B.java")].into_iter().collect::<BTreeSet<_>>());
        let cache = plan().into_cache(ProjectManifest::default(), BTreeMap::new(), deps);

        let records = cache.records();
        assert_eq!(records[0].dependencies, Some([p("B.java")].into_iter().collect()));
        assert_eq!(records[1].dependencies, Some([p("C.java")].into_iter().collect()));
        assert_eq!(records[2].dependencies, None);
    }

    #[test]
    fn issues_outside_the_compile_set_are_dropped() {
        let mut issues = BTreeMap::new();
        issues.insert(p("C.java"), vec![CompilerIssue::error("C.java", 1, 1, "stray")]);
        let cache = plan().into_cache(ProjectManifest::default(), issues, BTreeMap::new());
        assert_eq!(cache.records()[2].issues[0].message, "kept");
        assert_eq!(cache.error_count(), 0);
    }

    #[test]
    fn snapshot_is_recorded() {
        let manifest = ProjectManifest {
            project: Some("app".into()),
            ..ProjectManifest::default()
        };
        let cache = plan().into_cache(manifest.clone(), BTreeMap::new(), BTreeMap::new());
        assert_eq!(cache.manifest_snapshot, Some(manifest));
    }

    #[test]
    fn up_to_date() {
        let mut plan = plan();
        assert!(!plan.is_up_to_date());
        plan.files_to_compile.clear();
        assert!(plan.is_up_to_date());
        assert!(plan.sorted_files().is_empty());
    }
}
