//! Error types for compiler invocation.

use std::path::PathBuf;

use kiln_common::ErrorKind;

/// Errors that prevent a compile from running at all.
///
/// A compile that runs and reports diagnostics is not an error; its issues
/// come back in [`crate::CompileOutput`].
#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    /// The compiler executable could not be found.
    #[error("compiler '{executable}' not found: {reason}")]
    ToolNotFound {
        /// The executable that was looked up.
        executable: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// `PATH` is not set, so no executable can be looked up by name.
    #[error("cannot locate compiler '{executable}': PATH is not set")]
    NoSearchPath {
        /// The executable that was looked up.
        executable: String,
    },

    /// The compiler process could not be started.
    #[error("failed to run {executable}: {source}")]
    Spawn {
        /// The resolved executable.
        executable: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A classpath entry cannot be joined into a single classpath argument.
    #[error("invalid classpath entry: {reason}")]
    Classpath {
        /// Description of the failure.
        reason: String,
    },

    /// An I/O error occurred while preparing or writing outputs.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CompilerError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilerError::ToolNotFound { .. } | CompilerError::NoSearchPath { .. } => {
                ErrorKind::ToolNotFound
            }
            CompilerError::Spawn { .. } | CompilerError::Io { .. } => ErrorKind::Io,
            CompilerError::Classpath { .. } => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_is_distinct() {
        let err = CompilerError::ToolNotFound {
            executable: "javac".into(),
            reason: "cannot find binary path".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ToolNotFound);
        assert_eq!(
            err.to_string(),
            "compiler 'javac' not found: cannot find binary path"
        );
    }

    #[test]
    fn no_search_path() {
        let err = CompilerError::NoSearchPath {
            executable: "javac".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ToolNotFound);
        assert!(err.to_string().contains("PATH is not set"));
    }
}
