//! Error types for manifest and settings loading.

use kiln_common::ErrorKind;
use std::path::PathBuf;

/// Errors that can occur when loading `project.json` or `kiln.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The manifest file does not exist.
    #[error("no project.json found at {0}")]
    ManifestNotFound(PathBuf),

    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file content could not be parsed.
    #[error("failed to parse {what}: {reason}")]
    Parse {
        /// Which document failed to parse.
        what: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::ManifestNotFound(_) => ErrorKind::NotFound,
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::Parse { .. } | ConfigError::Validation(_) => ErrorKind::Parse,
        }
    }
}
