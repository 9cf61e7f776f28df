//! `kiln build`: the incremental build.
//!
//! 1. Load `project.json` and the previous `build.json` (absent means empty)
//! 2. Resolve the dependency closure from the package store
//! 3. Snapshot the source tree and compute the compile set
//! 4. Delete artifacts of deleted sources
//! 5. Compile the whole set in one compiler invocation and fold its issues
//!    into the records
//! 6. Persist the cache and report
//!
//! Anything that fails before step 6 leaves the previous cache untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_cache::{compute_compile_set, BuildCache, CompilePlan, CACHE_FILE};
use kiln_common::{InvalidPathError, RelativePath};
use kiln_compiler::{layout, CompileOptions, CompileRequest, Compiler, JavacCompiler};
use kiln_config::ProjectManifest;
use kiln_diagnostics::{CompilerIssue, IssueRenderer, WarningsMode};
use kiln_resolve::{FolderStore, PackageLocator};

use crate::error::BuildError;
use crate::pipeline::{resolve_project_root, snapshot_sources, SOURCE_FOLDER};
use crate::{BuildArgs, GlobalArgs};

/// Settings for one build that do not come from the manifest.
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// How warnings are displayed.
    pub warnings: WarningsMode,
    /// Suppress progress output and rendered issues.
    pub quiet: bool,
    /// Lint flags for the compiler.
    pub lint: Vec<String>,
    /// Boot classpath per language version.
    pub boot_classpath: BTreeMap<String, PathBuf>,
}

/// What a build did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Files handed to the compiler.
    pub compiled: usize,
    /// Deleted source files whose records and artifacts were removed.
    pub deleted: usize,
    /// Error-severity issues across every retained record.
    pub errors: usize,
    /// Warning-severity issues across every retained record.
    pub warnings: usize,
}

/// Runs the `kiln build` command.
///
/// Returns the number of error-severity issues as the exit code.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, BuildError> {
    let project_dir = resolve_project_root(args.project.as_deref())?;
    let settings = kiln_config::load_settings(&project_dir)?;

    let store_root = args
        .store
        .clone()
        .or_else(|| settings.store.resolve_root())
        .ok_or(BuildError::NoStore)?;

    let options = BuildOptions {
        warnings: args.warnings.map(Into::into).unwrap_or(settings.output.warnings),
        quiet: global.quiet,
        lint: settings.compiler.lint,
        boot_classpath: settings.compiler.boot_classpath,
    };
    let compiler = JavacCompiler::new(settings.compiler.executable);
    let store = FolderStore::new(store_root);
    tracing::debug!(store = %store.root().display(), "using package store");

    let report = build_project(&project_dir, &store, &compiler, &options)?;
    Ok(i32::try_from(report.errors).unwrap_or(i32::MAX))
}

/// Builds the project in `project_dir`.
pub fn build_project(
    project_dir: &Path,
    store: &impl PackageLocator,
    compiler: &dyn Compiler,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    let manifest = kiln_config::load_manifest(project_dir)?;
    let project_dir = std::fs::canonicalize(project_dir).map_err(BuildError::io(project_dir))?;
    let sources_dir = project_dir.join(SOURCE_FOLDER);
    let output_dir = project_dir.join(manifest.output_folder_name());
    let cache_path = output_dir.join(CACHE_FILE);

    let previous = BuildCache::load(&cache_path)?;
    let resolution = kiln_resolve::resolve(&manifest.signature(), manifest.dependencies(), store)?;

    let snapshots = snapshot_sources(&sources_dir, &output_dir)?;
    let plan = compute_compile_set(&snapshots, &previous, &manifest);
    let deleted = plan.changes.deleted_files.clone();

    let mut report = BuildReport {
        compiled: plan.files_to_compile.len(),
        deleted: deleted.len(),
        ..BuildReport::default()
    };

    // Artifacts of deleted sources go before compiling so dependents cannot
    // resolve against them.
    for path in &deleted {
        let removed =
            layout::remove_artifacts(&output_dir, path).map_err(BuildError::io(&output_dir))?;
        tracing::debug!(%path, removed, "removed artifacts of deleted source");
    }

    let cache = if plan.is_up_to_date() {
        plan.into_cache(manifest, BTreeMap::new(), BTreeMap::new())
    } else {
        if !options.quiet {
            eprintln!(
                "   Compiling {} ({} file{})",
                manifest.signature(),
                report.compiled,
                if report.compiled == 1 { "" } else { "s" }
            );
        }
        let compile_options = CompileOptions {
            language_version: manifest.language_version().map(str::to_string),
            classpath: resolution.artifacts(),
            lint: options.lint.clone(),
            boot_classpath: manifest
                .language_version()
                .and_then(|v| options.boot_classpath.get(v))
                .cloned(),
        };
        compile(plan, manifest, &sources_dir, &output_dir, compile_options, compiler)?
    };

    cache.save(&cache_path)?;

    for record in cache.records() {
        report.errors += record.error_count();
        report.warnings += record.issues.len() - record.error_count();
    }

    if !options.quiet {
        let renderer = IssueRenderer::new(options.warnings);
        let rendered = renderer.render_all(cache.records().iter().flat_map(|r| &r.issues));
        eprint!("{rendered}");
        if report.deleted > 0 {
            eprintln!("    Removed {} deleted source(s)", report.deleted);
        }
        if report.compiled == 0 && report.errors == 0 {
            eprintln!("    Fresh, nothing to compile");
        } else {
            eprintln!(
                "    Finished: {} error(s), {} warning(s)",
                report.errors, report.warnings
            );
        }
    }
    Ok(report)
}

fn compile(
    plan: CompilePlan,
    manifest: ProjectManifest,
    sources_dir: &Path,
    output_dir: &Path,
    options: CompileOptions,
    compiler: &dyn Compiler,
) -> Result<BuildCache, BuildError> {
    let request = CompileRequest::new(plan.sorted_files(), sources_dir, output_dir, options);
    let output = compiler.compile(&request)?;
    tracing::info!(
        exit_code = output.exit_code,
        issues = output.issues.len(),
        "compile finished"
    );

    let failed_silently = output.exit_code != 0 && output.error_count() == 0;
    let mut issues = group_issues(output.issues, sources_dir);
    if failed_silently {
        let reason = failure_reason(&output.raw_error, &output.raw_output, output.exit_code);
        tracing::warn!(exit_code = output.exit_code, %reason, "compiler failed without diagnostics");
        for path in request.source_files() {
            issues
                .entry(path.clone())
                .or_default()
                .push(CompilerIssue::error(path.as_str(), 1, 1, reason.clone()));
        }
    }
    Ok(plan.into_cache(manifest, issues, output.dependencies))
}

/// Summarizes a failed compiler run that produced no parseable error.
fn failure_reason(raw_error: &str, raw_output: &str, exit_code: i32) -> String {
    raw_error
        .lines()
        .chain(raw_output.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("compiler exited with status {exit_code}"))
}

/// Groups issues by the source file they refer to, rewriting each issue's
/// path relative to the source folder.
fn group_issues(
    issues: Vec<CompilerIssue>,
    sources_dir: &Path,
) -> BTreeMap<RelativePath, Vec<CompilerIssue>> {
    let mut grouped: BTreeMap<RelativePath, Vec<CompilerIssue>> = BTreeMap::new();
    for mut issue in issues {
        let path = match RelativePath::parse(&issue.source_file_path) {
            Ok(path) => Some(path),
            Err(InvalidPathError::Rooted(_)) => {
                RelativePath::from_base(sources_dir, Path::new(&issue.source_file_path))
            }
            Err(InvalidPathError::Empty) => None,
        };
        let Some(path) = path else {
            tracing::warn!(
                file = %issue.source_file_path,
                "issue for a file outside the source folder"
            );
            continue;
        };
        issue.source_file_path = path.as_str().to_string();
        grouped.entry(path).or_default().push(issue);
    }
    grouped
}
