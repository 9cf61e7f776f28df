//! Transitive dependency resolution against a local package store.
//!
//! [`resolve`] walks a manifest's declared dependencies breadth-first through
//! a [`PackageLocator`], reading each package's own manifest to discover its
//! dependencies. Two different versions of the same project anywhere in the
//! graph are a fatal [`ResolveError::Conflict`]; there is no version
//! selection.

#![warn(missing_docs)]

pub mod error;
pub mod resolver;
pub mod store;

pub use error::{DependencyRequest, ResolveError, VersionConflict};
pub use resolver::{resolve, Resolution};
pub use store::{FolderStore, PackageLocation, PackageLocator};
