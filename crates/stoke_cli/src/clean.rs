//! `stoke clean`: remove the build folder.

use std::path::Path;

use crate::settings::load_project;
use crate::{CleanArgs, GlobalArgs};

/// Runs the `stoke clean` command.
pub fn run(args: &CleanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let build = match &args.build {
        Some(build) => build.clone(),
        None => load_project(global)?.paths.build,
    };
    let removed = remove_build_dir(&build)?;
    if !global.quiet {
        if removed {
            eprintln!("    Removed {}", build.display());
        } else {
            eprintln!("    Nothing to clean at {}", build.display());
        }
    }
    Ok(0)
}

/// Deletes `build` recursively. Returns `false` if it did not exist.
fn remove_build_dir(build: &Path) -> std::io::Result<bool> {
    match std::fs::remove_dir_all(build) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
