//! Fatal build errors.

use std::path::PathBuf;

use stoke_cache::CacheError;

/// Conditions that abort a whole run.
///
/// Per-unit compile failures are never reported through this type; they are
/// counted in the run summary instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A directory the run needs could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A file the run manages could not be written or removed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The timestamp snapshot could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The source tree could not be walked.
    #[error("failed to walk source tree {root}: {source}")]
    Walk {
        /// The root of the walk.
        root: PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },
}
