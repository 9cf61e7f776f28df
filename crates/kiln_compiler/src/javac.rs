//! The `javac` process implementation of [`Compiler`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CompilerError;
use crate::protocol::{CompileOutput, CompileRequest, Compiler};

/// Compiles by spawning `javac`.
#[derive(Clone, Debug)]
pub struct JavacCompiler {
    executable: String,
}

impl Default for JavacCompiler {
    fn default() -> Self {
        Self::new("javac")
    }
}

impl JavacCompiler {
    /// Creates a compiler that runs `executable`, either a bare name looked up
    /// on `PATH` or a path to the binary.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Resolves the executable to a path.
    pub fn locate(&self) -> Result<PathBuf, CompilerError> {
        let path = Path::new(&self.executable);
        if path.components().count() > 1 {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(CompilerError::ToolNotFound {
                executable: self.executable.clone(),
                reason: "no such file".into(),
            });
        }
        if std::env::var_os("PATH").is_none() {
            return Err(CompilerError::NoSearchPath {
                executable: self.executable.clone(),
            });
        }
        which::which(&self.executable).map_err(|e| CompilerError::ToolNotFound {
            executable: self.executable.clone(),
            reason: e.to_string(),
        })
    }

    /// Asks the compiler for its own major version.
    fn host_major_version(&self, executable: &Path) -> Option<u32> {
        let output = Command::new(executable).arg("-version").output().ok()?;
        // Older JDKs print the banner on stderr.
        let banner = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let version = banner
            .split_whitespace()
            .skip_while(|word| *word != "javac")
            .nth(1)?;
        let major = parse_major(version);
        tracing::debug!(version, ?major, "probed host compiler version");
        major
    }
}

impl Compiler for JavacCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileOutput, CompilerError> {
        let executable = self.locate()?;
        std::fs::create_dir_all(&request.output_folder).map_err(|e| CompilerError::Io {
            path: request.output_folder.clone(),
            source: e,
        })?;

        let options = &request.options;
        let host_major = if options.boot_classpath.is_some() && options.language_version.is_some() {
            self.host_major_version(&executable)
        } else {
            None
        };
        let args = build_arguments(request, host_major)?;

        tracing::info!(
            executable = %executable.display(),
            files = request.source_files().len(),
            "invoking compiler"
        );
        tracing::debug!(?args, "compiler arguments");

        let output = Command::new(&executable)
            .args(&args)
            .current_dir(&request.root_folder)
            .output()
            .map_err(|e| CompilerError::Spawn {
                executable: executable.clone(),
                source: e,
            })?;

        let raw_output = String::from_utf8_lossy(&output.stdout).into_owned();
        let raw_error = String::from_utf8_lossy(&output.stderr).into_owned();
        let mut issues = kiln_diagnostics::parse(&raw_output);
        issues.extend(kiln_diagnostics::parse(&raw_error));
        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(exit_code, issues = issues.len(), "compiler finished");

        Ok(CompileOutput {
            exit_code,
            raw_output,
            raw_error,
            issues,
            dependencies: Default::default(),
        })
    }
}

/// Builds the `javac` argument list for `request`.
///
/// The order is fixed: output folder, lint flags, source and target version,
/// boot classpath, classpath, then the source files in path order. The boot
/// classpath is only passed when one is configured and the requested
/// language version is older than `host_major`.
pub fn build_arguments(
    request: &CompileRequest,
    host_major: Option<u32>,
) -> Result<Vec<OsString>, CompilerError> {
    let options = &request.options;
    let mut args: Vec<OsString> = vec!["-d".into(), request.output_folder.clone().into()];
    args.extend(options.lint.iter().map(OsString::from));

    if let Some(version) = &options.language_version {
        for flag in ["-source", "-target"] {
            args.push(OsString::from(flag));
            args.push(OsString::from(version));
        }

        if let (Some(boot), Some(target), Some(host)) =
            (&options.boot_classpath, parse_major(version), host_major)
        {
            if target < host {
                args.push("-bootclasspath".into());
                args.push(boot.clone().into());
            }
        }
    }

    let entries = std::iter::once(&request.output_folder).chain(&options.classpath);
    let classpath = std::env::join_paths(entries).map_err(|e| CompilerError::Classpath {
        reason: e.to_string(),
    })?;
    args.push("-classpath".into());
    args.push(classpath);

    args.extend(
        request
            .source_files()
            .iter()
            .map(|path| path.resolve(Path::new("")).into_os_string()),
    );
    Ok(args)
}

/// Extracts the major version from a Java version string.
///
/// Handles both the legacy `1.x` scheme (`"1.8.0_292"` is 8) and the modern
/// one (`"17.0.2"` is 17).
pub fn parse_major(version: &str) -> Option<u32> {
    let mut parts = version
        .trim()
        .split(|c: char| matches!(c, '.' | '_' | '-' | '+'));
    let first: u32 = parts.next()?.parse().ok()?;
    if first == 1 {
        parts.next()?.parse().ok()
    } else {
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CompileOptions;
    use kiln_common::RelativePath;

    fn request(options: CompileOptions) -> CompileRequest {
        CompileRequest::new(
            [RelativePath::new("b/C.java"), RelativePath::new("A.java")],
            "/p/sources",
            "/p/outputs",
            options,
        )
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn sep() -> &'static str {
        if cfg!(windows) {
            ";"
        } else {
            ":"
        }
    }

    #[test]
    fn parse_major_versions() {
        assert_eq!(parse_major("1.8"), Some(8));
        assert_eq!(parse_major("1.8.0_292"), Some(8));
        assert_eq!(parse_major("8"), Some(8));
        assert_eq!(parse_major("17.0.2"), Some(17));
        assert_eq!(parse_major("21-ea"), Some(21));
        assert_eq!(parse_major("java"), None);
        assert_eq!(parse_major(""), None);
    }

    #[test]
    fn minimal_arguments() {
        let args = build_arguments(&request(CompileOptions::default()), None).unwrap();
        let expected_source = Path::new("b").join("C.java");
        assert_eq!(
            strings(&args),
            vec![
                "-d".to_string(),
                "/p/outputs".into(),
                "-classpath".into(),
                "/p/outputs".into(),
                "A.java".into(),
                expected_source.to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn full_argument_order() {
        let options = CompileOptions {
            language_version: Some("8".into()),
            classpath: vec![PathBuf::from("/store/me/lib/2/lib.jar")],
            lint: vec!["-Xlint:unchecked".into()],
            boot_classpath: Some(PathBuf::from("/jdk8/rt.jar")),
        };
        let args = strings(&build_arguments(&request(options), Some(17)).unwrap());
        assert_eq!(
            &args[..11],
            &[
                "-d".to_string(),
                "/p/outputs".into(),
                "-Xlint:unchecked".into(),
                "-source".into(),
                "8".into(),
                "-target".into(),
                "8".into(),
                "-bootclasspath".into(),
                "/jdk8/rt.jar".into(),
                "-classpath".into(),
                format!("/p/outputs{}/store/me/lib/2/lib.jar", sep()),
            ]
        );
        assert_eq!(args.len(), 13);
    }

    #[test]
    fn boot_classpath_skipped_for_same_runtime() {
        let options = CompileOptions {
            language_version: Some("17".into()),
            boot_classpath: Some(PathBuf::from("/jdk17/rt.jar")),
            ..CompileOptions::default()
        };
        let args = strings(&build_arguments(&request(options), Some(17)).unwrap());
        assert!(!args.contains(&"-bootclasspath".to_string()));
    }

    #[test]
    fn boot_classpath_skipped_when_host_unknown() {
        let options = CompileOptions {
            language_version: Some("1.8".into()),
            boot_classpath: Some(PathBuf::from("/jdk8/rt.jar")),
            ..CompileOptions::default()
        };
        let args = strings(&build_arguments(&request(options), None).unwrap());
        assert!(!args.contains(&"-bootclasspath".to_string()));
        assert!(args.contains(&"1.8".to_string()));
    }

    #[test]
    fn missing_executable_is_tool_not_found() {
        let compiler = JavacCompiler::new("kiln-test-no-such-compiler-4471");
        let err = compiler.compile(&request(CompileOptions::default())).unwrap_err();
        assert_eq!(err.kind(), kiln_common::ErrorKind::ToolNotFound);
    }

    #[test]
    fn missing_executable_path_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = JavacCompiler::new(dir.path().join("bin").join("javac").to_string_lossy());
        let err = compiler.locate().unwrap_err();
        assert!(matches!(err, CompilerError::ToolNotFound { .. }));
    }
}
