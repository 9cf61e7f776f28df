//! Breadth-first transitive resolution with conflict detection.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use kiln_config::ProjectSignature;

use crate::error::{DependencyRequest, ResolveError, VersionConflict};
use crate::store::{PackageLocation, PackageLocator};

/// The flattened result of a successful resolution.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Resolution {
    /// One entry per resolved `(publisher, project)`, in discovery order.
    pub packages: Vec<PackageLocation>,
}

impl Resolution {
    /// Returns the artifact of every resolved package, in discovery order,
    /// ready to be appended to a classpath.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        self.packages.iter().map(|p| p.artifact.clone()).collect()
    }
}

/// Resolves the transitive closure of `declared` for the project `root`.
///
/// Packages are discovered breadth-first in declaration order. A package that
/// is requested again at the same version is deduplicated, and requests for
/// `root`'s own project are ignored. Requests for a different version of an
/// already-seen project are collected, and if there are any the whole
/// resolution fails with [`ResolveError::Conflict`]. Lookup failures are
/// returned as soon as they occur.
pub fn resolve(
    root: &ProjectSignature,
    declared: &[ProjectSignature],
    store: &impl PackageLocator,
) -> Result<Resolution, ResolveError> {
    let mut queue: VecDeque<DependencyRequest> = declared
        .iter()
        .map(|signature| DependencyRequest {
            signature: signature.clone(),
            requested_by: None,
        })
        .collect();

    let mut accepted: HashMap<(String, String), DependencyRequest> = HashMap::new();
    let mut conflicts: Vec<VersionConflict> = Vec::new();
    let mut resolution = Resolution::default();

    while let Some(request) = queue.pop_front() {
        let signature = &request.signature;
        if signature.same_project(root) {
            tracing::debug!(%signature, "skipping dependency on the project itself");
            continue;
        }

        let key = (signature.publisher.clone(), signature.project.clone());
        if let Some(first) = accepted.get(&key) {
            if first.signature.version != signature.version {
                record_conflict(&mut conflicts, first, request);
            }
            continue;
        }

        let location = store.locate(signature)?;
        tracing::debug!(%signature, folder = %location.folder.display(), "resolved package");
        for dependency in store.dependencies_of(&location)? {
            queue.push_back(DependencyRequest {
                signature: dependency,
                requested_by: Some(signature.clone()),
            });
        }
        resolution.packages.push(location);
        accepted.insert(key, request);
    }

    if !conflicts.is_empty() {
        return Err(ResolveError::Conflict(conflicts));
    }
    tracing::info!(count = resolution.packages.len(), "dependencies resolved");
    Ok(resolution)
}

fn record_conflict(
    conflicts: &mut Vec<VersionConflict>,
    first: &DependencyRequest,
    request: DependencyRequest,
) {
    let existing = conflicts
        .iter_mut()
        .find(|c| c.first.signature.same_project(&request.signature));
    match existing {
        Some(conflict) => {
            if !conflict.conflicting.contains(&request) {
                conflict.conflicting.push(request);
            }
        }
        None => conflicts.push(VersionConflict {
            first: first.clone(),
            conflicting: vec![request],
        }),
    }
}
