//! Incremental build cache management.
//!
//! This crate owns the persisted `build.json` model ([`BuildCache`] and its
//! per-file [`SourceFileRecord`]s) and the staleness engine that compares the
//! files on disk against it. [`compute_compile_set`] decides which files must
//! be recompiled, propagating invalidation along recorded dependency edges,
//! and [`CompilePlan::into_cache`] folds the compiler's results back into the
//! cache that is written at the end of the build.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod plan;
pub mod record;
pub mod staleness;

pub use cache::{BuildCache, CACHE_FILE};
pub use error::CacheError;
pub use plan::CompilePlan;
pub use record::SourceFileRecord;
pub use staleness::{compute_compile_set, detect_changes, ChangeSet, SourceSnapshot};
