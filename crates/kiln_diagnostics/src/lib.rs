//! Compiler diagnostics: the structured issue type, the parser that extracts
//! issues from raw compiler output, and terminal rendering.
//!
//! The [`parse`] function turns `path:line: severity: message` blocks with a
//! trailing caret line into [`CompilerIssue`] values. [`IssueRenderer`] formats
//! them for display according to a [`WarningsMode`].

#![warn(missing_docs)]

pub mod issue;
pub mod parser;
pub mod renderer;
pub mod severity;

pub use issue::CompilerIssue;
pub use parser::parse;
pub use renderer::{IssueRenderer, WarningsMode};
pub use severity::Severity;
