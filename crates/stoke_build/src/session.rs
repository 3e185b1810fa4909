//! Per-run unit bookkeeping shared by the builder and the header checker.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use stoke_cache::{decide, Decision, MarkerSource, TimestampStore};
use stoke_toolchain::{ToolStatus, ToolchainError};

use crate::error::BuildError;
use crate::report::{Action, BuildEvent, Reporter};
use crate::summary::{ErrorCeiling, Tally, UnitStatus};

/// Owns the timestamp store for one run.
///
/// Each unit goes through [`begin`](Self::begin) and, if it must run,
/// [`complete`](Self::complete). The marker is recorded when the unit starts
/// and invalidated again if the tool fails, so a failed unit is always retried
/// on the next run. A key that failed once in a run is never recorded again in
/// that run, even when another profile compiles the same file.
pub(crate) struct Session<'a> {
    store: TimestampStore,
    store_path: PathBuf,
    markers: MarkerSource,
    ceiling: ErrorCeiling,
    tally: Tally,
    reporter: &'a dyn Reporter,
    stopped_early: bool,
    failed: HashSet<String>,
}

impl<'a> Session<'a> {
    /// Loads the snapshot at `store_path`, or starts empty when `fresh`.
    ///
    /// A corrupt or incompatible snapshot is reported and replaced by an empty
    /// store; any other read failure aborts the run.
    pub(crate) fn open(
        store_path: PathBuf,
        fresh: bool,
        markers: MarkerSource,
        ceiling: ErrorCeiling,
        reporter: &'a dyn Reporter,
    ) -> Result<Self, BuildError> {
        let store = if fresh {
            TimestampStore::new()
        } else {
            match TimestampStore::load(&store_path) {
                Ok(store) => store,
                Err(error) if error.is_recoverable() => {
                    tracing::warn!(path = %store_path.display(), %error, "discarding snapshot");
                    reporter.report(&BuildEvent::SnapshotDiscarded {
                        path: &store_path,
                        error: &error,
                    });
                    TimestampStore::new()
                }
                Err(error) => return Err(error.into()),
            }
        };
        tracing::debug!(path = %store_path.display(), entries = store.len(), "snapshot ready");
        reporter.report(&BuildEvent::SnapshotLoaded {
            path: &store_path,
            entries: store.len(),
        });

        Ok(Self {
            store,
            store_path,
            markers,
            ceiling,
            tally: Tally::default(),
            reporter,
            stopped_early: false,
            failed: HashSet::new(),
        })
    }

    /// Decides whether `path` must run. Returns `true` if the caller should
    /// invoke the tool and then call [`complete`](Self::complete).
    pub(crate) fn begin(&mut self, path: &Path, key: &str, action: Action) -> bool {
        let marker = match self.markers.marker(path) {
            Ok(marker) => marker,
            Err(error) => {
                self.reporter
                    .report(&BuildEvent::MarkerUnavailable { path, error: &error });
                self.store.invalidate(key);
                self.failed.insert(key.to_string());
                self.tally.record(UnitStatus::Failed);
                return false;
            }
        };

        match decide(key, &marker, &self.store) {
            Decision::Skip => {
                tracing::debug!(key, "unchanged");
                self.reporter.report(&BuildEvent::UnitSkipped { path });
                self.tally.record(UnitStatus::Skipped);
                false
            }
            Decision::Rebuild => {
                tracing::debug!(key, %marker, "stale");
                if !self.failed.contains(key) {
                    self.store.record(key, marker);
                }
                self.reporter.report(&BuildEvent::UnitStarted { path, action });
                true
            }
        }
    }

    /// Accounts for the tool's result for a unit that [`begin`](Self::begin)
    /// started.
    pub(crate) fn complete(
        &mut self,
        path: &Path,
        key: &str,
        result: Result<ToolStatus, ToolchainError>,
    ) -> UnitStatus {
        let status = match result {
            Ok(ToolStatus::Success) => UnitStatus::Succeeded,
            Ok(ToolStatus::Failed { code }) => {
                self.reporter.report(&BuildEvent::UnitFailed { path, code });
                UnitStatus::Failed
            }
            Err(error) => {
                tracing::error!(key, %error, "toolchain launch failed");
                self.reporter
                    .report(&BuildEvent::LaunchFailed { path, error: &error });
                UnitStatus::LaunchFailed
            }
        };
        if status != UnitStatus::Succeeded {
            self.store.invalidate(key);
            self.failed.insert(key.to_string());
        }
        self.tally.record(status);
        status
    }

    /// Returns `true` once the error ceiling is reached, reporting it once.
    pub(crate) fn limit_reached(&mut self) -> bool {
        if !self.ceiling.is_reached(self.tally.errors) {
            return false;
        }
        if !self.stopped_early {
            self.stopped_early = true;
            self.reporter.report(&BuildEvent::CeilingReached {
                limit: self.ceiling.limit(),
            });
        }
        true
    }

    /// Writes the snapshot and returns the counters.
    pub(crate) fn finish(self) -> Result<(Tally, bool), BuildError> {
        self.store.save(&self.store_path)?;
        tracing::debug!(
            path = %self.store_path.display(),
            entries = self.store.len(),
            "snapshot written"
        );
        Ok((self.tally, self.stopped_early))
    }
}
