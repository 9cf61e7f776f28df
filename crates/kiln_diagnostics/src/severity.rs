//! Severity levels of compiler-reported issues.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a compiler issue.
///
/// Only [`Error`](Severity::Error) issues count towards the build's exit
/// status. Everything else the compiler reports is a warning.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A potential problem that does not stop the file from compiling.
    #[serde(alias = "Warning")]
    Warning,
    /// A problem that prevents the file from compiling.
    #[serde(alias = "Error")]
    Error,
}

impl Severity {
    /// Maps a compiler severity keyword onto a severity.
    ///
    /// `error` is an error; every other keyword is treated as a warning.
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword.eq_ignore_ascii_case("error") {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn keywords() {
        assert_eq!(Severity::from_keyword("error"), Severity::Error);
        assert_eq!(Severity::from_keyword("warning"), Severity::Warning);
        assert_eq!(Severity::from_keyword("note"), Severity::Warning);
    }

    #[test]
    fn is_error() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        let s: Severity = serde_json::from_str("\"Warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
    }
}
