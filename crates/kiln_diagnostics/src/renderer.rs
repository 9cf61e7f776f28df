//! Terminal rendering of compiler issues.

use crate::issue::CompilerIssue;
use crate::severity::Severity;
use serde::Deserialize;

/// How warnings are presented to the user.
///
/// This only affects display. Persisted severities and the exit status are
/// computed from the issues as the compiler reported them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningsMode {
    /// Show warnings as warnings.
    #[default]
    Show,
    /// Do not show warnings.
    Hide,
    /// Show warnings labelled as errors.
    Error,
}

/// Renders issues in a `path:line:column: severity: message` format.
pub struct IssueRenderer {
    /// How warnings are shown.
    pub warnings: WarningsMode,
}

impl IssueRenderer {
    /// Creates a new renderer.
    pub fn new(warnings: WarningsMode) -> Self {
        Self { warnings }
    }

    /// Renders a single issue, or `None` if it is hidden by the warnings mode.
    pub fn render(&self, issue: &CompilerIssue) -> Option<String> {
        let label = match (issue.severity, self.warnings) {
            (Severity::Error, _) => Severity::Error,
            (Severity::Warning, WarningsMode::Hide) => return None,
            (Severity::Warning, WarningsMode::Show) => Severity::Warning,
            (Severity::Warning, WarningsMode::Error) => Severity::Error,
        };
        Some(format!(
            "{}:{}:{}: {label}: {}",
            issue.source_file_path, issue.line, issue.column, issue.message
        ))
    }

    /// Renders every visible issue, one per line.
    pub fn render_all<'a>(&self, issues: impl IntoIterator<Item = &'a CompilerIssue>) -> String {
        let mut out = String::new();
        for line in issues.into_iter().filter_map(|issue| self.render(issue)) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
