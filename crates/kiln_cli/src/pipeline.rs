//! Shared helpers for CLI commands: project root lookup and source discovery.

use std::path::{Path, PathBuf};

use kiln_cache::SourceSnapshot;
use kiln_common::{RelativePath, Timestamp};
use kiln_compiler::layout;
use kiln_config::loader::MANIFEST_FILE;
use kiln_config::ConfigError;

use crate::error::BuildError;

/// Folder under the project that holds the source tree.
pub const SOURCE_FOLDER: &str = "sources";

/// Extension of source files.
pub const SOURCE_EXTENSION: &str = "java";

/// Walks up from `start` looking for the nearest folder containing `project.json`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, BuildError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(MANIFEST_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::ManifestNotFound(start.join(MANIFEST_FILE)).into());
        }
    }
}

/// Returns the project folder: `explicit` if given, else the nearest
/// ancestor of the current directory with a manifest.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf, BuildError> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().map_err(BuildError::io("."))?;
            find_project_root(&cwd)
        }
    }
}

/// Discovers source files under `dir` (recursive), sorted by path.
///
/// A missing folder has no sources.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        walk_dir(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    for entry in std::fs::read_dir(dir).map_err(BuildError::io(dir))? {
        let entry = entry.map_err(BuildError::io(dir))?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

/// Observes every source file under `sources_dir` along with its artifact
/// in `output_dir`.
pub fn snapshot_sources(
    sources_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<SourceSnapshot>, BuildError> {
    let mut snapshots = Vec::new();
    for file in discover_source_files(sources_dir)? {
        let Some(path) = RelativePath::from_base(sources_dir, &file) else {
            tracing::warn!(file = %file.display(), "skipping source outside the source folder");
            continue;
        };
        let modified = std::fs::metadata(&file)
            .and_then(|m| m.modified())
            .map_err(BuildError::io(&file))?;
        let artifact_modified = layout::artifact_modified(output_dir, &path);
        snapshots.push(SourceSnapshot {
            path,
            last_modified: Timestamp::from_system_time(modified),
            artifact_modified,
        });
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_java_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("a").join("b");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(dir.path().join("Main.java"), "class Main {}").unwrap();
        std::fs::write(pkg.join("Util.java"), "class Util {}").unwrap();
        std::fs::write(pkg.join("notes.txt"), "ignore").unwrap();

        let files = discover_source_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("Main.java"), pkg.join("Util.java")]);
    }

    #[test]
    fn missing_source_folder_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_source_files(&dir.path().join("sources")).unwrap().is_empty());
    }

    #[test]
    fn snapshots_use_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sources = dir.path().join(SOURCE_FOLDER);
        let outputs = dir.path().join("outputs");
        std::fs::create_dir_all(sources.join("a")).unwrap();
        std::fs::create_dir_all(outputs.join("a")).unwrap();
        std::fs::write(sources.join("a").join("B.java"), "class B {}").unwrap();
        std::fs::write(sources.join("C.java"), "class C {}").unwrap();
        std::fs::write(outputs.join("a").join("B.class"), "x").unwrap();

        let snapshots = snapshot_sources(&sources, &outputs).unwrap();
        let paths: Vec<_> = snapshots.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["C.java", "a/B.java"]);
        assert!(snapshots[0].artifact_modified.is_none());
        assert!(snapshots[1].artifact_modified.is_some());
    }

    #[test]
    fn project_root_found_from_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();
        let nested = dir.path().join(SOURCE_FOLDER).join("a");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn project_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert_eq!(err.kind(), kiln_common::ErrorKind::NotFound);
    }
}
