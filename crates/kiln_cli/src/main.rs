//! kiln: an incremental build tool for Java projects.
//!
//! Provides `kiln build`, which recompiles only the sources that changed
//! (and everything depending on them) since the last build, and `kiln clean`,
//! which removes the output folder.

#![warn(missing_docs)]

mod build;
mod clean;
mod error;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kiln_diagnostics::WarningsMode;
use tracing_subscriber::EnvFilter;

/// kiln: incremental builds for Java projects.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Incremental Java build tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the sources that changed since the last build.
    Build(BuildArgs),
    /// Remove the output folder and build cache.
    Clean(CleanArgs),
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Project folder. Defaults to the nearest ancestor with a `project.json`.
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Package store root, overriding `kiln.toml` and `KILN_HOME`.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// How to display warnings.
    #[arg(short, long, value_enum)]
    pub warnings: Option<WarningsArg>,
}

/// Arguments for the `kiln clean` subcommand.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Project folder. Defaults to the nearest ancestor with a `project.json`.
    #[arg(short, long)]
    pub project: Option<PathBuf>,
}

/// Warning display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WarningsArg {
    /// Show warnings as warnings.
    Show,
    /// Do not show warnings.
    Hide,
    /// Show warnings labelled as errors.
    Error,
}

impl From<WarningsArg> for WarningsMode {
    fn from(arg: WarningsArg) -> Self {
        match arg {
            WarningsArg::Show => WarningsMode::Show,
            WarningsArg::Hide => WarningsMode::Hide,
            WarningsArg::Error => WarningsMode::Error,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::debug!(kind = %e.kind(), "command failed");
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over the
/// level chosen by `--verbose`/`--quiet`.
fn init_logging(global: &GlobalArgs) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["kiln", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.project.is_none());
                assert!(args.store.is_none());
                assert!(args.warnings.is_none());
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from([
            "kiln",
            "build",
            "--project",
            "apps/hello",
            "--store",
            "/opt/packages",
            "--warnings",
            "error",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.project, Some(PathBuf::from("apps/hello")));
                assert_eq!(args.store, Some(PathBuf::from("/opt/packages")));
                assert_eq!(args.warnings, Some(WarningsArg::Error));
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_clean() {
        let cli = Cli::parse_from(["kiln", "clean", "-p", "apps/hello"]);
        match cli.command {
            Command::Clean(ref args) => {
                assert_eq!(args.project, Some(PathBuf::from("apps/hello")));
            }
            _ => panic!("expected Clean command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["kiln", "--quiet", "build"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);

        let cli = Cli::parse_from(["kiln", "build", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_warnings_mode() {
        assert!(Cli::try_parse_from(["kiln", "build", "--warnings", "loud"]).is_err());
    }

    #[test]
    fn warnings_arg_maps_to_mode() {
        assert_eq!(WarningsMode::from(WarningsArg::Show), WarningsMode::Show);
        assert_eq!(WarningsMode::from(WarningsArg::Hide), WarningsMode::Hide);
        assert_eq!(WarningsMode::from(WarningsArg::Error), WarningsMode::Error);
    }
}
