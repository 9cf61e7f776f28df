//! Tool settings deserialized from the optional `kiln.toml`.

use kiln_diagnostics::WarningsMode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Environment variable that overrides the kiln home folder.
pub const KILN_HOME_ENV: &str = "KILN_HOME";

/// Settings controlling how kiln runs, independent of the project manifest.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Package store location.
    #[serde(default)]
    pub store: StoreSettings,
    /// Compiler invocation settings.
    #[serde(default)]
    pub compiler: CompilerSettings,
    /// Display settings.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where resolved dependencies are looked up.
#[derive(Debug, Default, Deserialize)]
pub struct StoreSettings {
    /// Root of the package store. See [`StoreSettings::resolve_root`].
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl StoreSettings {
    /// Returns the configured root, else `$KILN_HOME/packages`, else
    /// `~/.kiln/packages`. Returns `None` if no home folder can be found.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        if let Some(root) = &self.root {
            return Some(root.clone());
        }
        if let Some(home) = std::env::var_os(KILN_HOME_ENV) {
            return Some(PathBuf::from(home).join("packages"));
        }
        dirs::home_dir().map(|home| home.join(".kiln").join("packages"))
    }
}

/// Which compiler to run and with which fixed flags.
#[derive(Debug, Deserialize)]
pub struct CompilerSettings {
    /// Executable name, resolved on `PATH`.
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Lint flags passed on every invocation.
    #[serde(default = "default_lint")]
    pub lint: Vec<String>,
    /// Boot classpath to use per target language version.
    #[serde(default)]
    pub boot_classpath: BTreeMap<String, PathBuf>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            lint: default_lint(),
            boot_classpath: BTreeMap::new(),
        }
    }
}

fn default_executable() -> String {
    "javac".to_string()
}

fn default_lint() -> Vec<String> {
    vec![
        "-Xlint:unchecked".to_string(),
        "-Xlint:deprecation".to_string(),
    ]
}

/// Display settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputSettings {
    /// How warnings are displayed.
    #[serde(default)]
    pub warnings: WarningsMode,
}
