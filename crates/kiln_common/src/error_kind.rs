//! Coarse error classification shared by every kiln error type.

use std::fmt;

/// The kind of failure an error represents.
///
/// Each crate defines its own error enum; all of them map onto one of these
/// kinds so the CLI can decide how to report a failure without matching on
/// every concrete variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// A file, folder, or cache entry that was expected does not exist.
    NotFound,
    /// Two incompatible versions of the same package were requested.
    Conflict,
    /// An external tool could not be located or launched.
    ToolNotFound,
    /// Persisted or user-supplied data could not be parsed.
    Parse,
    /// An I/O operation failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::ToolNotFound => write!(f, "tool not found"),
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::Io => write!(f, "I/O error"),
        }
    }
}
