//! The persisted build cache.

use std::path::Path;

use kiln_common::RelativePath;
use kiln_config::ProjectManifest;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::record::SourceFileRecord;

/// Name of the cache file within the output folder.
pub const CACHE_FILE: &str = "build.json";

/// Everything remembered about the previous build.
///
/// Serialized as `build.json` in the project's output folder:
///
/// ```json
/// { "project": { ...manifest snapshot... }, "source": [ { "path": "A.java", ... } ] }
/// ```
///
/// Both fields are optional so that a cache written by an interrupted or
/// older build still loads. An absent manifest snapshot forces a full rebuild.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct BuildCache {
    /// The manifest the cached records were compiled against.
    #[serde(rename = "project", default, skip_serializing_if = "Option::is_none")]
    pub manifest_snapshot: Option<ProjectManifest>,

    /// One record per source file, sorted by path.
    #[serde(rename = "source", default, skip_serializing_if = "Option::is_none")]
    pub source_files: Option<Vec<SourceFileRecord>>,
}

impl BuildCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache from a manifest snapshot and its records.
    pub fn with_records(manifest: ProjectManifest, records: Vec<SourceFileRecord>) -> Self {
        Self {
            manifest_snapshot: Some(manifest),
            source_files: Some(records),
        }
    }

    /// Returns the cached records, or an empty slice.
    pub fn records(&self) -> &[SourceFileRecord] {
        self.source_files.as_deref().unwrap_or_default()
    }

    /// Returns the record for `path`.
    ///
    /// Paths are compared exactly after normalization, so `a/B.java` and
    /// `A/B.java` are different files.
    pub fn record(&self, path: &RelativePath) -> Result<&SourceFileRecord, CacheError> {
        self.records()
            .iter()
            .find(|r| &r.path == path)
            .ok_or_else(|| CacheError::NotFound(path.clone()))
    }

    /// Returns the number of error-severity issues across all records.
    pub fn error_count(&self) -> usize {
        self.records().iter().map(SourceFileRecord::error_count).sum()
    }

    /// Parses a cache from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, CacheError> {
        serde_json::from_str(text).map_err(|e| CacheError::Parse {
            path: Path::new(CACHE_FILE).to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serializes the cache as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Loads the cache file at `path`.
    ///
    /// A missing file is an empty cache. A file that exists but does not
    /// parse is an error, so a corrupted cache is never silently discarded.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no build cache; starting empty");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| CacheError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Writes the cache to `path`, creating its parent folder if needed.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), records = self.records().len(), "build cache saved");
        Ok(())
    }
}
