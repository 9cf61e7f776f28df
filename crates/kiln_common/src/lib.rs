//! Shared foundational types used across the kiln build tool.
//!
//! This crate provides the timestamp type persisted in the build cache, the
//! validated relative path type used to key source files, and the error kind
//! taxonomy every kiln error maps onto.

#![warn(missing_docs)]

pub mod error_kind;
pub mod path;
pub mod timestamp;

pub use error_kind::ErrorKind;
pub use path::{InvalidPathError, RelativePath};
pub use timestamp::{ParseTimestampError, Timestamp};
