//! The compile request/response types and the [`Compiler`] trait.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use kiln_common::RelativePath;
use kiln_diagnostics::CompilerIssue;

use crate::error::CompilerError;

/// Anything that can compile a batch of source files.
pub trait Compiler {
    /// Compiles every file in `request` in a single invocation.
    ///
    /// Returns `Err` only when the compile could not run. Diagnostics,
    /// including errors, are reported in the returned [`CompileOutput`].
    /// Artifacts are written only for files that compiled without errors.
    fn compile(&self, request: &CompileRequest) -> Result<CompileOutput, CompilerError>;
}

/// Settings passed through to the compiler.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CompileOptions {
    /// Language version to compile for, used for both source and target.
    pub language_version: Option<String>,
    /// Resolved dependency artifacts, appended to the classpath after the
    /// output folder.
    pub classpath: Vec<PathBuf>,
    /// Lint flags, passed verbatim.
    pub lint: Vec<String>,
    /// Runtime library to compile against when targeting an older runtime
    /// than the host compiler's.
    pub boot_classpath: Option<PathBuf>,
}

/// One compile invocation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompileRequest {
    source_files: Vec<RelativePath>,
    /// The source folder. Source paths are relative to it, and the compiler
    /// runs with it as its working directory.
    pub root_folder: PathBuf,
    /// Where compiled artifacts are written.
    pub output_folder: PathBuf,
    /// Compiler settings.
    pub options: CompileOptions,
}

impl CompileRequest {
    /// Creates a request for `source_files`, which are sorted and deduplicated.
    ///
    /// # Panics
    ///
    /// Panics if `source_files` is empty.
    pub fn new(
        source_files: impl IntoIterator<Item = RelativePath>,
        root_folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        options: CompileOptions,
    ) -> Self {
        let source_files: Vec<RelativePath> = source_files
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        assert!(
            !source_files.is_empty(),
            "a compile request needs at least one source file"
        );
        Self {
            source_files,
            root_folder: root_folder.into(),
            output_folder: output_folder.into(),
            options,
        }
    }

    /// The files to compile, in path order.
    pub fn source_files(&self) -> &[RelativePath] {
        &self.source_files
    }

    /// Returns `true` if `path` is part of this request.
    pub fn contains(&self, path: &RelativePath) -> bool {
        self.source_files.binary_search(path).is_ok()
    }
}

/// What a compiler reported.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CompileOutput {
    /// The compiler's exit code.
    pub exit_code: i32,
    /// Captured standard output.
    pub raw_output: String,
    /// Captured standard error.
    pub raw_error: String,
    /// Structured diagnostics, in the order reported.
    pub issues: Vec<CompilerIssue>,
    /// Per-file source dependencies, for compilers that report them.
    /// Files without an entry keep whatever was known before.
    pub dependencies: BTreeMap<RelativePath, BTreeSet<RelativePath>>,
}

impl CompileOutput {
    /// Returns the number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_sorts_and_dedups() {
        let request = CompileRequest::new(
            [
                RelativePath::new("b/C.java"),
                RelativePath::new("A.java"),
                RelativePath::new("b/C.java"),
            ],
            "/p/sources",
            "/p/outputs",
            CompileOptions::default(),
        );
        let names: Vec<_> = request.source_files().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["A.java", "b/C.java"]);
        assert!(request.contains(&RelativePath::new("A.java")));
        assert!(!request.contains(&RelativePath::new("Z.java")));
    }

    #[test]
    #[should_panic(expected = "at least one source file")]
    fn empty_request_panics() {
        CompileRequest::new(
            Vec::new(),
            "/p/sources",
            "/p/outputs",
            CompileOptions::default(),
        );
    }

    #[test]
    fn output_error_count() {
        let output = CompileOutput {
            issues: vec![
                CompilerIssue::error("A.java", 1, 1, "e"),
                CompilerIssue::warning("A.java", 1, 1, "w"),
            ],
            ..CompileOutput::default()
        };
        assert_eq!(output.error_count(), 1);
    }
}
