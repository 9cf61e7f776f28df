//! An in-memory [`Compiler`] for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs::File;
use std::sync::{Mutex, PoisonError};

use kiln_common::{RelativePath, Timestamp};
use kiln_diagnostics::CompilerIssue;

use crate::error::CompilerError;
use crate::layout;
use crate::protocol::{CompileOutput, CompileRequest, Compiler};

type Behavior = dyn Fn(&CompileRequest) -> Vec<CompilerIssue> + Send + Sync;

/// Placeholder contents of every artifact the fake compiler writes.
pub const FAKE_BYTECODE: &[u8] = b"\xCA\xFE\xBA\xBEfake";

/// A compiler that spawns nothing.
///
/// Issues come from a closure (or a canned list filtered to the requested
/// files). Like a real compiler, it writes an artifact for every requested
/// file that has no error issue and none for files that do. Artifacts are
/// stamped with [`FakeCompiler::set_artifact_time`] if one was set, so
/// timestamp comparisons are deterministic. Every request is recorded.
pub struct FakeCompiler {
    behavior: Box<Behavior>,
    dependencies: BTreeMap<RelativePath, BTreeSet<RelativePath>>,
    artifact_time: Mutex<Option<Timestamp>>,
    requests: Mutex<Vec<CompileRequest>>,
    tool_missing: bool,
}

impl Default for FakeCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCompiler {
    /// A compiler for which every file compiles cleanly.
    pub fn new() -> Self {
        Self::from_fn(|_| Vec::new())
    }

    /// A compiler whose issues are computed by `behavior`.
    pub fn from_fn(
        behavior: impl Fn(&CompileRequest) -> Vec<CompilerIssue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            behavior: Box::new(behavior),
            dependencies: BTreeMap::new(),
            artifact_time: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            tool_missing: false,
        }
    }

    /// A compiler that reports `issues`, restricted to the requested files.
    pub fn with_issues(issues: Vec<CompilerIssue>) -> Self {
        Self::from_fn(move |request| {
            issues
                .iter()
                .filter(|issue| {
                    RelativePath::parse(&issue.source_file_path)
                        .is_ok_and(|path| request.contains(&path))
                })
                .cloned()
                .collect()
        })
    }

    /// A compiler whose executable cannot be found.
    pub fn missing_tool() -> Self {
        Self {
            tool_missing: true,
            ..Self::new()
        }
    }

    /// Reports `dependencies` for `path` whenever `path` is compiled.
    pub fn with_dependencies(
        mut self,
        path: RelativePath,
        dependencies: impl IntoIterator<Item = RelativePath>,
    ) -> Self {
        self.dependencies
            .insert(path, dependencies.into_iter().collect());
        self
    }

    /// Sets the modification time given to artifacts written from now on.
    pub fn set_artifact_time(&self, time: Timestamp) {
        *self
            .artifact_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(time);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many times [`Compiler::compile`] was called.
    pub fn compile_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn write_artifact(
        &self,
        request: &CompileRequest,
        source: &RelativePath,
    ) -> Result<(), CompilerError> {
        let path = layout::artifact_path(&request.output_folder, source);
        let io_err = |e| CompilerError::Io {
            path: path.clone(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, FAKE_BYTECODE).map_err(io_err)?;

        let time = *self
            .artifact_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(time) = time {
            File::options()
                .write(true)
                .open(&path)
                .and_then(|f| f.set_modified(time.to_system_time()))
                .map_err(io_err)?;
        }
        Ok(())
    }
}

impl Compiler for FakeCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileOutput, CompilerError> {
        if self.tool_missing {
            return Err(CompilerError::ToolNotFound {
                executable: "fake".into(),
                reason: "simulated missing compiler".into(),
            });
        }
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let issues = (self.behavior)(request);
        let failed: BTreeSet<RelativePath> = issues
            .iter()
            .filter(|issue| issue.severity.is_error())
            .filter_map(|issue| RelativePath::parse(&issue.source_file_path).ok())
            .collect();

        for source in request.source_files() {
            if !failed.contains(source) {
                self.write_artifact(request, source)?;
            }
        }

        let dependencies = self
            .dependencies
            .iter()
            .filter(|(path, _)| request.contains(path))
            .map(|(path, deps)| (path.clone(), deps.clone()))
            .collect();

        let exit_code = if failed.is_empty() { 0 } else { 1 };
        tracing::debug!(
            files = request.source_files().len(),
            issues = issues.len(),
            exit_code,
            "fake compile finished"
        );
        Ok(CompileOutput {
            exit_code,
            raw_output: String::new(),
            raw_error: render_raw(&issues),
            issues,
            dependencies,
        })
    }
}

/// Formats issues the way `javac` prints them.
fn render_raw(issues: &[CompilerIssue]) -> String {
    let mut out = String::new();
    for issue in issues {
        let _ = writeln!(
            out,
            "{}:{}: {}: {}",
            issue.source_file_path, issue.line, issue.severity, issue.message
        );
        let _ = writeln!(out, "{}^", " ".repeat((issue.column as usize).saturating_sub(1)));
    }
    let errors = issues.iter().filter(|i| i.severity.is_error()).count();
    if errors > 0 {
        let _ = writeln!(out, "{errors} error{}", if errors == 1 { "" } else { "s" });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CompileOptions;
    use std::path::Path;

    fn request(out: &Path, files: &[&str]) -> CompileRequest {
        CompileRequest::new(
            files.iter().map(|f| RelativePath::new(f)),
            out.join("sources"),
            out.join("outputs"),
            CompileOptions::default(),
        )
    }

    #[test]
    fn clean_compile_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::new();
        let req = request(dir.path(), &["A.java", "pkg/B.java"]);
        let out = compiler.compile(&req).unwrap();

        assert_eq!(out.exit_code, 0);
        assert!(out.issues.is_empty());
        let outputs = dir.path().join("outputs");
        assert_eq!(std::fs::read(outputs.join("A.class")).unwrap(), FAKE_BYTECODE);
        assert!(outputs.join("pkg").join("B.class").exists());
        assert_eq!(compiler.compile_count(), 1);
        assert_eq!(compiler.requests()[0], req);
    }

    #[test]
    fn errors_suppress_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::with_issues(vec![
            CompilerIssue::error("A.java", 3, 5, "cannot find symbol"),
            CompilerIssue::warning("B.java", 1, 1, "unchecked"),
            CompilerIssue::error("Z.java", 1, 1, "not requested"),
        ]);
        let out = compiler
            .compile(&request(dir.path(), &["A.java", "B.java"]))
            .unwrap();

        assert_eq!(out.exit_code, 1);
        assert_eq!(out.issues.len(), 2);
        let outputs = dir.path().join("outputs");
        assert!(!outputs.join("A.class").exists());
        assert!(outputs.join("B.class").exists());
    }

    #[test]
    fn raw_output_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let issues = vec![
            CompilerIssue::error("A.java", 3, 5, "cannot find symbol"),
            CompilerIssue::warning("A.java", 7, 1, "deprecated"),
        ];
        let compiler = FakeCompiler::with_issues(issues.clone());
        let out = compiler.compile(&request(dir.path(), &["A.java"])).unwrap();
        assert_eq!(kiln_diagnostics::parse(&out.raw_error), issues);
        assert!(out.raw_error.ends_with("1 error\n"));
    }

    #[test]
    fn artifact_time_is_controllable() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::new();
        let stamp = Timestamp::from_epoch_nanos(1_600_000_000_000_000_000);
        compiler.set_artifact_time(stamp);
        compiler.compile(&request(dir.path(), &["A.java"])).unwrap();

        let written =
            layout::artifact_modified(&dir.path().join("outputs"), &RelativePath::new("A.java"));
        let written = written.unwrap().epoch_nanos().unwrap();
        // Filesystem timestamp resolution varies; seconds always survive.
        assert_eq!(written / 1_000_000_000, 1_600_000_000);
    }

    #[test]
    fn dependencies_reported_for_compiled_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::new()
            .with_dependencies(RelativePath::new("A.java"), [RelativePath::new("B.java")])
            .with_dependencies(RelativePath::new("C.java"), []);
        let out = compiler.compile(&request(dir.path(), &["A.java"])).unwrap();
        assert_eq!(out.dependencies.len(), 1);
        assert!(out.dependencies[&RelativePath::new("A.java")].contains(&RelativePath::new("B.java")));
    }

    #[test]
    fn closure_sees_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::from_fn(|request| {
            request
                .source_files()
                .iter()
                .map(|p| CompilerIssue::warning(p.as_str(), 1, 1, "seen"))
                .collect()
        });
        let out = compiler
            .compile(&request(dir.path(), &["A.java", "B.java"]))
            .unwrap();
        assert_eq!(out.issues.len(), 2);
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn missing_tool_fails_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::missing_tool();
        let err = compiler.compile(&request(dir.path(), &["A.java"])).unwrap_err();
        assert_eq!(err.kind(), kiln_common::ErrorKind::ToolNotFound);
        assert_eq!(compiler.compile_count(), 0);
        assert!(!dir.path().join("outputs").exists());
    }

    #[test]
    fn raw_text_tolerates_column_zero() {
        let issue = CompilerIssue::error("A.java", 2, 0, "broken");
        let raw = render_raw(&[issue]);
        assert_eq!(raw, "A.java:2: error: broken\n^\n1 error\n");
    }
}
