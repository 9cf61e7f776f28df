//! Extraction of structured issues from raw compiler output.
//!
//! The compiler prints each diagnostic as a header line
//! `<path>:<line>: <severity>: <message>` followed by some source context, one
//! line of which holds a single `^` under the offending column:
//!
//! ```text
//! a/B.java:3: error: ';' expected
//!         int x = 5
//!                  ^
//! 1 error
//! ```
//!
//! A header's path never starts with whitespace and never contains a quote,
//! so quoted source text echoed in the context is not mistaken for one.
//!
//! Parsing is best-effort. Anything that is not a header is ignored, and a
//! header with no caret line before the next header (or the end of the input)
//! produces no issue.

use std::sync::OnceLock;

use regex::Regex;

use crate::issue::CompilerIssue;
use crate::severity::Severity;

struct Header<'a> {
    path: &'a str,
    line: u32,
    severity: Severity,
    message: &'a str,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(
            r#"^(?P<path>[^\s"][^"]*?):(?P<line>\d+): (?P<keyword>[A-Za-z]+):\s?(?P<message>.*)$"#,
        )
            .expect("header pattern is valid")
    })
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let caps = header_regex().captures(line)?;
    let line_number: u32 = caps.name("line")?.as_str().parse().ok()?;
    if line_number == 0 {
        return None;
    }
    Some(Header {
        path: caps.name("path")?.as_str(),
        line: line_number,
        severity: Severity::from_keyword(caps.name("keyword")?.as_str()),
        message: caps.name("message")?.as_str(),
    })
}

/// Returns the 1-based column marked by a caret line.
///
/// Columns count Unicode scalar values, so a tab is one column.
fn caret_column(line: &str) -> Option<u32> {
    if line.trim() != "^" {
        return None;
    }
    let offset = line.chars().take_while(|&c| c != '^').count();
    u32::try_from(offset + 1).ok()
}

/// Parses raw compiler output into issues, in the order they were reported.
///
/// Never fails: output with no recognizable diagnostics yields an empty list.
pub fn parse(raw_output: &str) -> Vec<CompilerIssue> {
    let lines: Vec<&str> = raw_output.lines().collect();
    let mut issues = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(header) = parse_header(lines[i]) else {
            i += 1;
            continue;
        };

        let mut j = i + 1;
        let mut column = None;
        while j < lines.len() {
            if parse_header(lines[j]).is_some() {
                break;
            }
            j += 1;
            if let Some(col) = caret_column(lines[j - 1]) {
                column = Some(col);
                break;
            }
        }

        match column {
            Some(column) => issues.push(CompilerIssue::new(
                header.path,
                header.line,
                column,
                header.severity,
                header.message,
            )),
            None => tracing::debug!(
                path = header.path,
                line = header.line,
                "diagnostic without caret line skipped"
            ),
        }
        i = j;
    }

    issues
}
