//! Error types for dependency resolution.

use kiln_common::ErrorKind;
use kiln_config::ProjectSignature;
use std::fmt;
use std::path::PathBuf;

/// A single request for a package, together with the project that asked for it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DependencyRequest {
    /// The requested package.
    pub signature: ProjectSignature,
    /// The dependent project that introduced the request, or `None` if the
    /// manifest being built declared it directly.
    pub requested_by: Option<ProjectSignature>,
}

impl fmt::Display for DependencyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requested_by {
            Some(origin) => write!(f, "{} (required by {origin})", self.signature),
            None => write!(f, "{} (declared directly)", self.signature),
        }
    }
}

/// Every conflicting request made for one `(publisher, project)` pair.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VersionConflict {
    /// The first request seen for the project. Direct requests are always
    /// seen before transitive ones.
    pub first: DependencyRequest,
    /// Later requests for a different version, in discovery order.
    pub conflicting: Vec<DependencyRequest>,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "conflicting versions of {}/{}:",
            self.first.signature.publisher, self.first.signature.project
        )?;
        write!(f, "  {}", self.first)?;
        for request in &self.conflicting {
            write!(f, "\n  {request}")?;
        }
        Ok(())
    }
}

/// Errors that can occur while resolving dependencies.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The publisher folder for a package does not exist in the store.
    #[error("cannot resolve {signature}: no publisher folder found at {expected}")]
    PublisherNotFound {
        /// The package being resolved.
        signature: ProjectSignature,
        /// Where the publisher folder was expected.
        expected: PathBuf,
    },

    /// The project folder for a package does not exist under its publisher.
    #[error("cannot resolve {signature}: no project folder found at {expected}")]
    ProjectNotFound {
        /// The package being resolved.
        signature: ProjectSignature,
        /// Where the project folder was expected.
        expected: PathBuf,
    },

    /// The requested version folder does not exist under the project.
    #[error("cannot resolve {signature}: no version folder found at {expected}")]
    VersionNotFound {
        /// The package being resolved.
        signature: ProjectSignature,
        /// Where the version folder was expected.
        expected: PathBuf,
    },

    /// Different versions of the same project were requested.
    #[error("{}", render_conflicts(.0))]
    Conflict(Vec<VersionConflict>),

    /// A package's own manifest could not be parsed.
    #[error("invalid manifest for {signature} at {path}: {reason}")]
    Manifest {
        /// The package whose manifest is broken.
        signature: ProjectSignature,
        /// The manifest path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// An I/O error occurred while reading the store.
    #[error("package store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn render_conflicts(conflicts: &[VersionConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ResolveError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::PublisherNotFound { .. }
            | ResolveError::ProjectNotFound { .. }
            | ResolveError::VersionNotFound { .. } => ErrorKind::NotFound,
            ResolveError::Conflict(_) => ErrorKind::Conflict,
            ResolveError::Manifest { .. } => ErrorKind::Parse,
            ResolveError::Io { .. } => ErrorKind::Io,
        }
    }
}
