//! Manifest and settings file loading.

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::types::ProjectManifest;
use std::path::Path;

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "project.json";

/// File name of the optional tool settings.
pub const SETTINGS_FILE: &str = "kiln.toml";

/// Loads `<project_dir>/project.json`.
///
/// A missing file is [`ConfigError::ManifestNotFound`].
pub fn load_manifest(project_dir: &Path) -> Result<ProjectManifest, ConfigError> {
    let path = project_dir.join(MANIFEST_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ManifestNotFound(path));
        }
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };
    load_manifest_from_str(&content).map_err(|e| match e {
        ConfigError::Parse { reason, .. } => ConfigError::Parse {
            what: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// Parses a manifest from JSON text.
pub fn load_manifest_from_str(content: &str) -> Result<ProjectManifest, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        what: MANIFEST_FILE.to_string(),
        reason: e.to_string(),
    })
}

/// Loads `<project_dir>/kiln.toml`, or default settings if it does not exist.
pub fn load_settings(project_dir: &Path) -> Result<Settings, ConfigError> {
    let path = project_dir.join(SETTINGS_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => load_settings_from_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Parses and validates settings from TOML text.
pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::Parse {
        what: SETTINGS_FILE.to_string(),
        reason: e.to_string(),
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.compiler.executable.trim().is_empty() {
        return Err(ConfigError::Validation(
            "compiler.executable must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectSignature;
    use kiln_diagnostics::WarningsMode;
    use std::path::PathBuf;

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "publisher": "me",
            "project": "app",
            "version": "3",
            "java": {
                "outputFolder": "bin",
                "version": "8",
                "dependencies": [
                    { "publisher": "me", "project": "lib", "version": "2" }
                ],
                "shortcutName": "app"
            }
        }"#;
        let m = load_manifest_from_str(json).unwrap();
        assert_eq!(m.publisher.as_deref(), Some("me"));
        assert_eq!(m.output_folder_name(), "bin");
        assert_eq!(m.language_version(), Some("8"));
        assert_eq!(m.dependencies(), &[ProjectSignature::new("me", "lib", "2")]);
        assert_eq!(
            m.language.as_ref().unwrap().shortcut_name.as_deref(),
            Some("app")
        );
    }

    #[test]
    fn parse_empty_manifest() {
        let m = load_manifest_from_str("{}").unwrap();
        assert_eq!(m, ProjectManifest::default());
    }

    #[test]
    fn invalid_json_errors() {
        let err = load_manifest_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ManifestNotFound(_)));
    }

    #[test]
    fn load_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("project.json"), r#"{"project":"x"}"#).unwrap();
        let m = load_manifest(dir.path()).unwrap();
        assert_eq!(m.project.as_deref(), Some("x"));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("project.json"), "[").unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("project.json"));
    }

    #[test]
    fn missing_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(dir.path()).unwrap();
        assert_eq!(s.compiler.executable, "javac");
        assert_eq!(s.output.warnings, WarningsMode::Show);
        assert!(s.store.root.is_none());
    }

    #[test]
    fn parse_full_settings() {
        let toml = r#"
[store]
root = "/var/kiln/packages"

[compiler]
executable = "javac17"
lint = ["-Xlint:all"]

[compiler.boot_classpath]
"8" = "/jdk8/jre/lib/rt.jar"

[output]
warnings = "error"
"#;
        let s = load_settings_from_str(toml).unwrap();
        assert_eq!(s.store.root, Some(PathBuf::from("/var/kiln/packages")));
        assert_eq!(s.compiler.executable, "javac17");
        assert_eq!(s.compiler.lint, vec!["-Xlint:all"]);
        assert_eq!(
            s.compiler.boot_classpath.get("8"),
            Some(&PathBuf::from("/jdk8/jre/lib/rt.jar"))
        );
        assert_eq!(s.output.warnings, WarningsMode::Error);
    }

    #[test]
    fn empty_executable_fails_validation() {
        let err = load_settings_from_str("[compiler]\nexecutable = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_settings_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
