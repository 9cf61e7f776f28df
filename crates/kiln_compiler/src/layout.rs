//! Where compiled artifacts live in the output folder.
//!
//! The artifact of `a/B.java` is `<output>/a/B.class`. Nested and anonymous
//! classes declared in the same file compile to `B$Inner.class` siblings.

use std::path::{Path, PathBuf};

use kiln_common::{RelativePath, Timestamp};

/// Extension of compiled artifacts.
pub const ARTIFACT_EXTENSION: &str = "class";

/// Returns the primary artifact path for `source`.
pub fn artifact_path(output_folder: &Path, source: &RelativePath) -> PathBuf {
    source
        .with_extension(ARTIFACT_EXTENSION)
        .resolve(output_folder)
}

/// Returns the modification time of `source`'s artifact, or `None` if it
/// does not exist.
pub fn artifact_modified(output_folder: &Path, source: &RelativePath) -> Option<Timestamp> {
    std::fs::metadata(artifact_path(output_folder, source))
        .and_then(|m| m.modified())
        .ok()
        .map(Timestamp::from_system_time)
}

/// Deletes every artifact produced from `source`, returning how many were
/// removed. Missing artifacts are not an error.
pub fn remove_artifacts(output_folder: &Path, source: &RelativePath) -> std::io::Result<usize> {
    let primary = artifact_path(output_folder, source);
    let Some(folder) = primary.parent() else {
        return Ok(0);
    };
    let stem = source
        .file_name()
        .rsplit_once('.')
        .map_or(source.file_name(), |(stem, _)| stem);
    let nested_prefix = format!("{stem}$");
    let primary_name = format!("{stem}.{ARTIFACT_EXTENSION}");

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let is_nested = name.starts_with(&nested_prefix)
            && name.ends_with(&format!(".{ARTIFACT_EXTENSION}"));
        if name == primary_name || is_nested {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
