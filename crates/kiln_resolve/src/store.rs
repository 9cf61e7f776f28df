//! Package store lookup.
//!
//! The store is laid out as `<root>/<publisher>/<project>/<version>/`, where
//! each version folder holds that version's `project.json` and its compiled
//! `<project>.jar`.

use std::path::{Path, PathBuf};

use kiln_config::{ConfigError, ProjectSignature};

use crate::error::ResolveError;

/// Where a resolved package lives in the store.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PackageLocation {
    /// The package that was located.
    pub signature: ProjectSignature,
    /// The package's version folder.
    pub folder: PathBuf,
    /// The build artifact to put on the compiler classpath.
    pub artifact: PathBuf,
}

/// Finds packages and reads their declared dependencies.
pub trait PackageLocator {
    /// Locates the version folder for `signature`.
    fn locate(&self, signature: &ProjectSignature) -> Result<PackageLocation, ResolveError>;

    /// Returns the dependencies declared by a located package, in declaration order.
    fn dependencies_of(
        &self,
        location: &PackageLocation,
    ) -> Result<Vec<ProjectSignature>, ResolveError>;
}

/// A package store on the local filesystem.
#[derive(Clone, Debug)]
pub struct FolderStore {
    root: PathBuf,
}

impl FolderStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageLocator for FolderStore {
    fn locate(&self, signature: &ProjectSignature) -> Result<PackageLocation, ResolveError> {
        let publisher_folder = self.root.join(&signature.publisher);
        if !publisher_folder.is_dir() {
            return Err(ResolveError::PublisherNotFound {
                signature: signature.clone(),
                expected: publisher_folder,
            });
        }

        let project_folder = publisher_folder.join(&signature.project);
        if !project_folder.is_dir() {
            return Err(ResolveError::ProjectNotFound {
                signature: signature.clone(),
                expected: project_folder,
            });
        }

        let version_folder = project_folder.join(&signature.version);
        if !version_folder.is_dir() {
            return Err(ResolveError::VersionNotFound {
                signature: signature.clone(),
                expected: version_folder,
            });
        }

        let artifact = version_folder.join(format!("{}.jar", signature.project));
        Ok(PackageLocation {
            signature: signature.clone(),
            folder: version_folder,
            artifact,
        })
    }

    fn dependencies_of(
        &self,
        location: &PackageLocation,
    ) -> Result<Vec<ProjectSignature>, ResolveError> {
        match kiln_config::load_manifest(&location.folder) {
            Ok(manifest) => Ok(manifest.dependencies().to_vec()),
            Err(ConfigError::ManifestNotFound(path)) => {
                tracing::warn!(
                    package = %location.signature,
                    path = %path.display(),
                    "package has no manifest; assuming no dependencies"
                );
                Ok(Vec::new())
            }
            Err(ConfigError::Io { path, source }) => Err(ResolveError::Io { path, source }),
            Err(e) => Err(ResolveError::Manifest {
                signature: location.signature.clone(),
                path: location.folder.join("project.json"),
                reason: e.to_string(),
            }),
        }
    }
}
