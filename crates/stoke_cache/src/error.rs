//! Error types for snapshot and marker operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing timestamp state.
///
/// A missing snapshot is not an error: [`TimestampStore::load`](crate::TimestampStore::load)
/// returns an empty store in that case. Corruption is reported as
/// [`CacheError::Corrupt`] so that the caller decides whether to start over.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a snapshot or source file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot exists but its content could not be parsed.
    #[error("corrupt timestamp snapshot {path}: {reason}")]
    Corrupt {
        /// The snapshot file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The snapshot was written by an incompatible format version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The snapshot file path.
        path: PathBuf,
        /// The format version this build understands.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// The in-memory store could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl CacheError {
    /// Returns `true` if the snapshot content is unusable but the file system is fine.
    ///
    /// Callers recover from these by starting with an empty store.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CacheError::Corrupt { .. } | CacheError::VersionMismatch { .. }
        )
    }
}
