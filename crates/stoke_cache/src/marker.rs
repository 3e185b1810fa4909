//! Modification markers and the source that observes them.
//!
//! A [`Marker`] is an opaque snapshot of a file's modification state. Markers
//! are only ever compared for equality, never ordered, so the same staleness
//! policy works for timestamps and content hashes alike.

use std::fmt;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Opaque, equality-comparable snapshot of a file's modification state.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    /// Wraps an already rendered marker string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the rendered marker.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({})", self.0)
    }
}

/// Which property of a file is used as its marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Last-modified time, rendered as `<secs>.<nanos>` since the Unix epoch.
    #[default]
    Mtime,
    /// XXH3-128 hash of the file content, rendered as 32 hex digits.
    Content,
}

/// Produces markers for files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerSource {
    kind: MarkerKind,
}

impl MarkerSource {
    /// Creates a marker source of the given kind.
    pub fn new(kind: MarkerKind) -> Self {
        Self { kind }
    }

    /// Observes the current marker of the file at `path`.
    pub fn marker(&self, path: &Path) -> Result<Marker, CacheError> {
        let io_err = |e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        match self.kind {
            MarkerKind::Mtime => {
                let modified = std::fs::metadata(path)
                    .and_then(|m| m.modified())
                    .map_err(io_err)?;
                // Pre-epoch times still need a distinct rendering.
                let rendered = match modified.duration_since(UNIX_EPOCH) {
                    Ok(d) => format!("{}.{:09}", d.as_secs(), d.subsec_nanos()),
                    Err(e) => {
                        let d = e.duration();
                        format!("-{}.{:09}", d.as_secs(), d.subsec_nanos())
                    }
                };
                Ok(Marker(rendered))
            }
            MarkerKind::Content => {
                let content = std::fs::read(path).map_err(io_err)?;
                let hash = xxhash_rust::xxh3::xxh3_128(&content);
                Ok(Marker(format!("{hash:032x}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn set_mtime(path: &Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn mtime_marker_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "int main() { return 0; }").unwrap();

        let source = MarkerSource::new(MarkerKind::Mtime);
        assert_eq!(source.marker(&path).unwrap(), source.marker(&path).unwrap());
    }

    #[test]
    fn mtime_marker_renders_seconds_and_nanos() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "").unwrap();
        set_mtime(&path, 1_700_000_000);

        let m = MarkerSource::new(MarkerKind::Mtime).marker(&path).unwrap();
        assert_eq!(m.as_str(), "1700000000.000000000");
    }

    #[test]
    fn mtime_marker_changes_with_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "").unwrap();
        let source = MarkerSource::new(MarkerKind::Mtime);

        set_mtime(&path, 1_000);
        let before = source.marker(&path).unwrap();
        set_mtime(&path, 2_000);
        let after = source.marker(&path).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn content_marker_tracks_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.c");
        let b = dir.path().join("b.c");
        std::fs::write(&a, "int a;").unwrap();
        std::fs::write(&b, "int a;").unwrap();
        let source = MarkerSource::new(MarkerKind::Content);

        let ma = source.marker(&a).unwrap();
        assert_eq!(ma, source.marker(&b).unwrap());
        assert_eq!(ma.as_str().len(), 32);

        std::fs::write(&b, "int b;").unwrap();
        assert_ne!(ma, source.marker(&b).unwrap());
    }

    #[test]
    fn missing_file_errors() {
        let source = MarkerSource::default();
        let err = source.marker(Path::new("/nonexistent/file.c")).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn marker_kind_deserializes_lowercase() {
        let kind: MarkerKind = serde_json::from_str("\"content\"").unwrap();
        assert_eq!(kind, MarkerKind::Content);
        assert_eq!(MarkerKind::default(), MarkerKind::Mtime);
    }
}
