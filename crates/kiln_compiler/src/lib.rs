//! The compiler protocol and its implementations.
//!
//! The build orchestrator talks to a compiler only through the [`Compiler`]
//! trait: one call per build, with every file to compile. [`JavacCompiler`]
//! runs the real `javac` process and parses its diagnostics;
//! [`FakeCompiler`] simulates one in memory, writing placeholder class files
//! with a controllable timestamp so incremental behavior can be tested
//! deterministically.

#![warn(missing_docs)]

pub mod error;
pub mod fake;
pub mod javac;
pub mod layout;
pub mod protocol;

pub use error::CompilerError;
pub use fake::FakeCompiler;
pub use javac::JavacCompiler;
pub use protocol::{CompileOptions, CompileOutput, CompileRequest, Compiler};
