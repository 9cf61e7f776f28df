//! `kiln clean`: removes the output folder, cache included.

use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::pipeline::resolve_project_root;
use crate::{CleanArgs, GlobalArgs};

/// Runs the `kiln clean` command.
pub fn run(args: &CleanArgs, global: &GlobalArgs) -> Result<i32, BuildError> {
    let project_dir = resolve_project_root(args.project.as_deref())?;
    let removed = clean_project(&project_dir)?;
    if !global.quiet {
        match removed {
            Some(folder) => eprintln!("    Removed {}", folder.display()),
            None => eprintln!("    Nothing to clean"),
        }
    }
    Ok(0)
}

/// Deletes the output folder of the project in `project_dir`.
///
/// Returns the deleted folder, or `None` if there was nothing to delete.
pub fn clean_project(project_dir: &Path) -> Result<Option<PathBuf>, BuildError> {
    let manifest = kiln_config::load_manifest(project_dir)?;
    let output_dir = project_dir.join(manifest.output_folder_name());
    match std::fs::remove_dir_all(&output_dir) {
        Ok(()) => {
            tracing::info!(folder = %output_dir.display(), "output folder removed");
            Ok(Some(output_dir))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BuildError::io(output_dir)(e)),
    }
}
