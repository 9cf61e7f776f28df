//! Deciding which source files must be recompiled.
//!
//! Each file on disk is classified against its cached record as new,
//! modified, or unchanged, and records without a file on disk are deleted.
//! Invalidation then spreads from the new and modified files, and from
//! files that depended on a deleted one, to every file that transitively
//! depends on them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use kiln_common::{RelativePath, Timestamp};
use kiln_config::ProjectManifest;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::cache::BuildCache;
use crate::plan::CompilePlan;
use crate::record::SourceFileRecord;

/// A source file as currently observed on disk.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourceSnapshot {
    /// Path relative to the source folder.
    pub path: RelativePath,
    /// The file's current modification time.
    pub last_modified: Timestamp,
    /// Modification time of the file's compiled artifact, or `None` if the
    /// artifact does not exist.
    pub artifact_modified: Option<Timestamp>,
}

/// Classification of source files against the cache.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ChangeSet {
    /// Files with no cached record.
    pub new_files: Vec<RelativePath>,

    /// Files whose cached record is out of date, had issues, or whose
    /// artifact is missing or older than the source.
    pub modified_files: Vec<RelativePath>,

    /// Cached files that no longer exist on disk.
    pub deleted_files: Vec<RelativePath>,

    /// Files whose cached record is still valid.
    pub unchanged_files: Vec<RelativePath>,
}

impl ChangeSet {
    /// Returns `true` if there are no changes (no new, modified, or deleted files).
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Returns the number of files that changed themselves (new + modified).
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }
}

/// Classifies `current` against the records of `previous`.
pub fn detect_changes(current: &[SourceSnapshot], previous: &BuildCache) -> ChangeSet {
    let cached: BTreeMap<&RelativePath, &SourceFileRecord> =
        previous.records().iter().map(|r| (&r.path, r)).collect();
    let mut changes = ChangeSet::default();

    for snapshot in current {
        match cached.get(&snapshot.path) {
            None => changes.new_files.push(snapshot.path.clone()),
            Some(record) if is_stale(snapshot, record) => {
                changes.modified_files.push(snapshot.path.clone())
            }
            Some(_) => changes.unchanged_files.push(snapshot.path.clone()),
        }
    }

    let on_disk: BTreeSet<&RelativePath> = current.iter().map(|s| &s.path).collect();
    changes.deleted_files = cached
        .keys()
        .filter(|path| !on_disk.contains(*path))
        .map(|path| (*path).clone())
        .collect();

    changes
}

fn is_stale(snapshot: &SourceSnapshot, record: &SourceFileRecord) -> bool {
    if record.has_issues() {
        return true;
    }
    if record.last_modified != Some(snapshot.last_modified) {
        return true;
    }
    match snapshot.artifact_modified {
        Some(artifact) => artifact < snapshot.last_modified,
        None => true,
    }
}

/// Computes which files to compile and the provisional records for the build.
///
/// If `manifest` differs from the cached snapshot in a way that affects the
/// build (see [`ProjectManifest::same_build_identity`]), or there is no
/// snapshot, every file is compiled and the cached records are discarded.
/// Otherwise the compile set is every new or modified file, every file that
/// depended on a deleted file, and everything that transitively depends on
/// those. Files whose dependencies were never computed are added whenever
/// anything else is compiled or any file was deleted.
///
/// Records in the returned plan are sorted by path. Files outside the
/// compile set keep their cached record unchanged.
pub fn compute_compile_set(
    current: &[SourceSnapshot],
    previous: &BuildCache,
    manifest: &ProjectManifest,
) -> CompilePlan {
    let mut snapshots: Vec<&SourceSnapshot> = current.iter().collect();
    snapshots.sort_by(|a, b| a.path.cmp(&b.path));
    snapshots.dedup_by(|a, b| a.path == b.path);

    let changes = detect_changes(current, previous);

    let manifest_changed = match &previous.manifest_snapshot {
        Some(snapshot) => !snapshot.same_build_identity(manifest),
        None => true,
    };
    if manifest_changed {
        tracing::info!("project manifest changed; rebuilding everything");
        let records = snapshots
            .iter()
            .map(|s| SourceFileRecord::new(s.path.clone()).with_last_modified(s.last_modified))
            .collect::<Vec<_>>();
        let files_to_compile = records.iter().map(|r| r.path.clone()).collect();
        return CompilePlan {
            files_to_compile,
            records,
            manifest_changed,
            changes,
        };
    }

    let cached: BTreeMap<&RelativePath, &SourceFileRecord> =
        previous.records().iter().map(|r| (&r.path, r)).collect();
    let deleted: BTreeSet<&RelativePath> = changes.deleted_files.iter().collect();

    let mut seeds: BTreeSet<&RelativePath> = changes
        .new_files
        .iter()
        .chain(&changes.modified_files)
        .collect();
    for snapshot in &snapshots {
        let depends_on_deleted = cached
            .get(&snapshot.path)
            .is_some_and(|r| deleted.iter().any(|&d| r.depends_on(d)));
        if depends_on_deleted {
            seeds.insert(&snapshot.path);
        }
    }

    let mut to_compile = propagate(&seeds, &snapshots, &cached);

    // A file with unknown dependencies may refer to anything that changed,
    // deleted files included.
    if !to_compile.is_empty() || !deleted.is_empty() {
        for snapshot in &snapshots {
            let unknown = cached
                .get(&snapshot.path)
                .is_some_and(|r| r.dependencies.is_none());
            if unknown {
                to_compile.insert(&snapshot.path);
            }
        }
    }

    let records = snapshots
        .iter()
        .map(|s| match cached.get(&s.path) {
            Some(record) if !to_compile.contains(&s.path) => (*record).clone(),
            Some(record) => provisional(s, Some(*record), &deleted),
            None => provisional(s, None, &deleted),
        })
        .collect();

    tracing::debug!(
        dirty = changes.dirty_count(),
        deleted = changes.deleted_files.len(),
        compile = to_compile.len(),
        "staleness computed"
    );

    let files_to_compile = to_compile.into_iter().cloned().collect();
    CompilePlan {
        files_to_compile,
        records,
        manifest_changed,
        changes,
    }
}

/// Walks reverse dependency edges from `seeds`, returning every file reached.
///
/// Only edges recorded for files still on disk are followed, so a deleted
/// file's stale record never pulls anything in. Cycles terminate because a
/// file is enqueued at most once.
fn propagate<'a>(
    seeds: &BTreeSet<&'a RelativePath>,
    snapshots: &[&'a SourceSnapshot],
    cached: &BTreeMap<&'a RelativePath, &'a SourceFileRecord>,
) -> BTreeSet<&'a RelativePath> {
    // Edge dependency -> dependent.
    let mut dependents: DiGraphMap<&'a str, ()> = DiGraphMap::new();
    for &snapshot in snapshots {
        let Some(deps) = cached.get(&snapshot.path).and_then(|&r| r.dependencies.as_ref()) else {
            continue;
        };
        for dep in deps {
            if dep != &snapshot.path {
                dependents.add_edge(dep.as_str(), snapshot.path.as_str(), ());
            }
        }
    }

    let by_name: BTreeMap<&str, &'a RelativePath> =
        snapshots.iter().map(|&s| (s.path.as_str(), &s.path)).collect();

    let mut reached: BTreeSet<&'a RelativePath> = seeds.clone();
    let mut worklist: VecDeque<&'a str> = seeds.iter().map(|&path| path.as_str()).collect();
    while let Some(node) = worklist.pop_front() {
        if !dependents.contains_node(node) {
            continue;
        }
        for dependent in dependents.neighbors_directed(node, Direction::Outgoing) {
            if let Some(&path) = by_name.get(dependent) {
                if reached.insert(path) {
                    worklist.push_back(dependent);
                }
            }
        }
    }
    reached
}

fn provisional(
    snapshot: &SourceSnapshot,
    cached: Option<&SourceFileRecord>,
    deleted: &BTreeSet<&RelativePath>,
) -> SourceFileRecord {
    let mut record =
        SourceFileRecord::new(snapshot.path.clone()).with_last_modified(snapshot.last_modified);
    if let Some(cached) = cached {
        record.dependencies = cached
            .dependencies
            .as_ref()
            .map(|deps| deps.iter().filter(|d| !deleted.contains(d)).cloned().collect());
        record.issues = cached.issues.clone();
    }
    record
}
