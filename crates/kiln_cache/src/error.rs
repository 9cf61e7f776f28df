//! Error types for cache operations.

use std::path::PathBuf;

use kiln_common::{ErrorKind, RelativePath};

/// Errors that can occur during cache operations.
///
/// A cache file that does not exist is not an error (it loads as an empty
/// cache). A cache file that exists but cannot be parsed is.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing the cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file exists but is not a valid build cache.
    #[error("failed to parse build cache {path}: {reason}")]
    Parse {
        /// The cache file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// No record exists for the requested source file.
    #[error("no cached record for source file '{0}'")]
    NotFound(RelativePath),

    /// The cache could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl CacheError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::Io { .. } => ErrorKind::Io,
            CacheError::Parse { .. } | CacheError::Serialization { .. } => ErrorKind::Parse,
            CacheError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
