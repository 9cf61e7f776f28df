//! Manifest types deserialized from `project.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default name of the folder compiled artifacts are written to.
pub const DEFAULT_OUTPUT_FOLDER: &str = "outputs";

/// Identifies a project in the package store: who published it, its name,
/// and the exact version requested.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct ProjectSignature {
    /// The publisher (first level of the package store).
    pub publisher: String,
    /// The project name (second level of the package store).
    pub project: String,
    /// The requested version. Compared as an opaque string.
    pub version: String,
}

impl ProjectSignature {
    /// Creates a new signature.
    pub fn new(
        publisher: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            project: project.into(),
            version: version.into(),
        }
    }

    /// Returns `true` if both signatures name the same publisher and project,
    /// regardless of version.
    pub fn same_project(&self, other: &ProjectSignature) -> bool {
        self.publisher == other.publisher && self.project == other.project
    }
}

impl fmt::Display for ProjectSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.publisher, self.project, self.version)
    }
}

/// The parsed `project.json` manifest.
///
/// Every field is optional at parse time. Equality covers all fields; the
/// narrower [`ProjectManifest::same_build_identity`] decides whether a change
/// invalidates every compiled file.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// The publisher of this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// The project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// The project's own version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Language-specific build settings.
    #[serde(rename = "java", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageConfig>,
}

/// The `java` section of the manifest.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// Name of the output folder, relative to the project folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<String>,
    /// Language version to compile for (e.g. `"8"` or `"1.8"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Declared dependencies, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ProjectSignature>,
    /// Launcher shortcut name. Not used by the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut_name: Option<String>,
}

impl ProjectManifest {
    /// Returns this project's own signature, with missing fields left empty.
    pub fn signature(&self) -> ProjectSignature {
        ProjectSignature::new(
            self.publisher.clone().unwrap_or_default(),
            self.project.clone().unwrap_or_default(),
            self.version.clone().unwrap_or_default(),
        )
    }

    /// Returns the declared dependencies, or an empty slice.
    pub fn dependencies(&self) -> &[ProjectSignature] {
        self.language
            .as_ref()
            .map(|l| l.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// Returns the configured language version, if any.
    pub fn language_version(&self) -> Option<&str> {
        self.language.as_ref()?.version.as_deref()
    }

    /// Returns the output folder name, defaulting to [`DEFAULT_OUTPUT_FOLDER`].
    pub fn output_folder_name(&self) -> &str {
        self.language
            .as_ref()
            .and_then(|l| l.output_folder.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_FOLDER)
    }

    /// Returns `true` if a build against `other` is still valid for this
    /// manifest without recompiling everything.
    ///
    /// Compares publisher, project, output folder, language version, and the
    /// set of depended-on projects. The project's own version and the
    /// versions of its dependencies are not part of the identity.
    pub fn same_build_identity(&self, other: &ProjectManifest) -> bool {
        self.publisher == other.publisher
            && self.project == other.project
            && self.output_folder_name() == other.output_folder_name()
            && self.language_version() == other.language_version()
            && self.dependency_projects() == other.dependency_projects()
    }

    fn dependency_projects(&self) -> BTreeSet<(&str, &str)> {
        self.dependencies()
            .iter()
            .map(|d| (d.publisher.as_str(), d.project.as_str()))
            .collect()
    }
}
