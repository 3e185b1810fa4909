//! Source tree discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::BuildError;

/// Lists every regular file below `root`, in sorted walk order.
///
/// Directories listed in `exclude` (typically the build folder, which may sit
/// inside the source tree) are not descended into. Exclusion compares
/// canonical paths, so `./BUILD` and `BUILD` name the same folder.
///
/// Only a failure to read `root` itself is an error. An unreadable entry below
/// it is logged and skipped, and the walk continues with its siblings.
pub fn source_files(root: &Path, exclude: &[PathBuf]) -> Result<Vec<PathBuf>, BuildError> {
    let excluded: Vec<PathBuf> = exclude
        .iter()
        .filter_map(|p| p.canonicalize().ok())
        .collect();

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, &excluded));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(BuildError::Walk {
                    root: root.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    tracing::debug!(root = %root.display(), files = files.len(), "walked source tree");
    Ok(files)
}

fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .path()
        .canonicalize()
        .is_ok_and(|canonical| excluded.contains(&canonical))
}
