//! A single structured compiler issue.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// One error or warning reported by the compiler.
///
/// Immutable value type with structural equality. `line` and `column` are
/// both 1-based. The source path is stored with `/` separators regardless of
/// how the compiler printed it.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerIssue {
    /// Path of the offending source file, as reported by the compiler.
    pub source_file_path: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Error or warning.
    #[serde(rename = "type")]
    pub severity: Severity,
    /// The compiler's message text.
    pub message: String,
}

impl CompilerIssue {
    /// Creates a new issue.
    ///
    /// # Panics
    ///
    /// Panics if `line` or `column` is zero.
    pub fn new(
        source_file_path: impl Into<String>,
        line: u32,
        column: u32,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        assert!(line >= 1, "issue line must be 1-based");
        assert!(column >= 1, "issue column must be 1-based");
        Self {
            source_file_path: source_file_path.into().replace('\\', "/"),
            line,
            column,
            severity,
            message: message.into(),
        }
    }

    /// Creates a new error issue.
    pub fn error(
        source_file_path: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::new(source_file_path, line, column, Severity::Error, message)
    }

    /// Creates a new warning issue.
    pub fn warning(
        source_file_path: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::new(source_file_path, line, column, Severity::Warning, message)
    }
}
