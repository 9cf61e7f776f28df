//! The error type for CLI commands.

use std::path::PathBuf;

use kiln_cache::CacheError;
use kiln_common::ErrorKind;
use kiln_compiler::CompilerError;
use kiln_config::ConfigError;
use kiln_resolve::ResolveError;

/// Anything that stops a command before it can report a build result.
///
/// Every variant maps to exit status 1. Compile errors are not `BuildError`s;
/// they are counted into the exit status instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The manifest or settings could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dependencies could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The build cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The compiler could not be run.
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// No package store was configured and no home folder was found.
    #[error("no package store configured; pass --store or set KILN_HOME")]
    NoStore,

    /// A filesystem operation on the project failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl BuildError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Config(e) => e.kind(),
            BuildError::Resolve(e) => e.kind(),
            BuildError::Cache(e) => e.kind(),
            BuildError::Compiler(e) => e.kind(),
            BuildError::NoStore => ErrorKind::NotFound,
            BuildError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
