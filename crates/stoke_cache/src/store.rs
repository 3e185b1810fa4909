//! The persisted timestamp snapshot.
//!
//! A snapshot maps normalized unit keys to the marker observed the last time
//! the unit was processed successfully. An entry whose value is `null` has been
//! invalidated by a failed run and is always rebuilt. The snapshot is a small
//! JSON document written through a temporary file and renamed into place, so an
//! interrupted write never leaves a truncated snapshot behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::marker::Marker;

/// Snapshot format version. Increment on breaking changes to the document layout.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// In-memory mapping from unit key to its last successfully processed marker.
///
/// `None` values are invalidated entries: the key is known but its last
/// processing failed, so the next staleness decision is always a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampStore {
    /// Layout version of the persisted document.
    format_version: u32,

    /// Per-unit markers, sorted by key for stable output.
    entries: BTreeMap<String, Option<Marker>>,
}

/// Header-only view used to check the version before parsing entries.
#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}

impl TimestampStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            format_version: STORE_FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Loads a snapshot from `path`.
    ///
    /// A missing file yields an empty store. Unparseable content yields
    /// [`CacheError::Corrupt`] and a snapshot from another format version yields
    /// [`CacheError::VersionMismatch`]; partial content is never merged.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no timestamp snapshot, starting empty");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let header: VersionHeader =
            serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if header.format_version != STORE_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: STORE_FORMAT_VERSION,
                actual: header.format_version,
            });
        }

        let store: Self = serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), entries = store.len(), "loaded timestamp snapshot");
        Ok(store)
    }

    /// Writes the snapshot to `path`, replacing any previous snapshot atomically.
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over `path`. The temporary file is removed on every error path.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CacheError::Io {
                path: tmp.path().to_path_buf(),
                source: e,
            })?;
        tmp.persist(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        tracing::debug!(path = %path.display(), entries = self.len(), "saved timestamp snapshot");
        Ok(())
    }

    /// Returns the entry for `key`: `None` if unknown, `Some(None)` if invalidated.
    pub fn get(&self, key: &str) -> Option<Option<&Marker>> {
        self.entries.get(key).map(Option::as_ref)
    }

    /// Returns the marker recorded for `key`, if it is present and not invalidated.
    pub fn marker(&self, key: &str) -> Option<&Marker> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Records `marker` as the current state of `key`.
    pub fn record(&mut self, key: &str, marker: Marker) {
        self.entries.insert(key.to_string(), Some(marker));
    }

    /// Invalidates `key` so that the next decision for it is always a rebuild.
    pub fn invalidate(&mut self, key: &str) {
        self.entries.insert(key.to_string(), None);
    }

    /// Returns the number of entries, including invalidated ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TimestampStore {
    fn default() -> Self {
        Self::new()
    }
}
