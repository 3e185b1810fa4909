//! Configuration resolution shared by all subcommands.
//!
//! Layering is defaults, then `stoke.toml`, then command-line overrides.
//! Relative paths in a `stoke.toml` outside the current folder are resolved
//! against that file's folder; command-line paths stay relative to the
//! current folder.

use std::path::{Path, PathBuf};

use stoke_config::{load_config, load_config_file, ConfigError, ProjectConfig, Verbosity};

use crate::GlobalArgs;

/// Returns the folder holding the project's `stoke.toml`.
pub fn project_dir(global: &GlobalArgs) -> PathBuf {
    match &global.config {
        Some(config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                p.parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                p
            }
        }
        None => PathBuf::from("."),
    }
}

/// Loads the project configuration and applies the global flags.
///
/// `--config` may name a file, which must exist, or a folder whose
/// `stoke.toml` is optional.
pub fn load_project(global: &GlobalArgs) -> Result<ProjectConfig, ConfigError> {
    let dir = project_dir(global);
    let mut config = match &global.config {
        Some(config_path) if !Path::new(config_path).is_dir() => {
            load_config_file(Path::new(config_path))?
        }
        _ => load_config(&dir)?,
    };
    anchor_paths(&mut config, &dir);
    config.run.verbosity = Verbosity::from_flags(global.quiet, global.verbose);
    tracing::debug!(project = %dir.display(), ?config, "resolved configuration");
    Ok(config)
}

/// Resolves relative folders of `config` against `dir`.
fn anchor_paths(config: &mut ProjectConfig, dir: &Path) {
    if dir == Path::new(".") {
        return;
    }
    let anchor = |path: &mut PathBuf| {
        if path.is_relative() {
            *path = dir.join(&*path);
        }
    };
    anchor(&mut config.paths.build);
    anchor(&mut config.paths.source);
    config
        .toolchain
        .c
        .include_dirs
        .iter_mut()
        .chain(config.toolchain.cpp.include_dirs.iter_mut())
        .chain(config.check.include_dirs.iter_mut())
        .for_each(anchor);
}
