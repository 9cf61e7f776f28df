//! Parsing of the `project.json` manifest and the optional `kiln.toml`
//! tool settings.
//!
//! The manifest is the project's declarative identity and dependency list.
//! kiln reads it but never writes it. The settings file tunes how kiln runs:
//! where the package store lives, which compiler to invoke, and how warnings
//! are displayed.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_manifest, load_manifest_from_str, load_settings, load_settings_from_str};
pub use settings::{CompilerSettings, OutputSettings, Settings, StoreSettings};
pub use types::{LanguageConfig, ProjectManifest, ProjectSignature};
