//! Counters and outcomes returned by a run.

use std::time::Duration;

/// What happened to a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    /// The marker matched the snapshot; nothing ran.
    Skipped,
    /// The tool ran and succeeded.
    Succeeded,
    /// The tool ran and failed, or the unit's marker could not be read.
    Failed,
    /// The tool could not be started.
    LaunchFailed,
}

/// Per-run counters.
///
/// `processed` counts every unit that was not skipped, successful or not.
/// Launch failures are included in `errors` and additionally counted in
/// `launch_failures`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Units whose tool was run (or attempted).
    pub processed: usize,
    /// Units skipped as unchanged.
    pub skipped: usize,
    /// Units that failed.
    pub errors: usize,
    /// Units whose tool could not be launched.
    pub launch_failures: usize,
}

impl Tally {
    /// Accounts for one unit.
    pub fn record(&mut self, status: UnitStatus) {
        match status {
            UnitStatus::Skipped => self.skipped += 1,
            UnitStatus::Succeeded => self.processed += 1,
            UnitStatus::Failed => {
                self.processed += 1;
                self.errors += 1;
            }
            UnitStatus::LaunchFailed => {
                self.processed += 1;
                self.errors += 1;
                self.launch_failures += 1;
            }
        }
    }

    /// Units seen in total.
    pub fn total(&self) -> usize {
        self.processed + self.skipped
    }
}

/// Stops a run once enough units have failed.
///
/// A limit of 0 means unlimited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorCeiling {
    limit: usize,
}

impl ErrorCeiling {
    /// Creates a ceiling for `limit` errors.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The configured limit (0 = unlimited).
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` once `errors` has reached the limit.
    pub fn is_reached(&self, errors: usize) -> bool {
        self.limit > 0 && errors >= self.limit
    }
}

/// Result of the link decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Not linked because at least one unit failed.
    SkippedErrors,
    /// Not linked because no unit was processed.
    NoChanges,
    /// The linker ran and succeeded.
    Linked,
    /// The linker ran and failed.
    Failed {
        /// The linker's exit code, if it exited normally.
        code: Option<i32>,
    },
    /// The linker could not be started.
    LaunchFailed,
}

/// Outcome of a build run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Unit counters.
    pub tally: Tally,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// What the link step did.
    pub link: LinkOutcome,
    /// `true` if the error ceiling cut the run short.
    pub stopped_early: bool,
}

impl RunSummary {
    /// Returns `true` if the link step was attempted.
    pub fn did_link(&self) -> bool {
        matches!(
            self.link,
            LinkOutcome::Linked | LinkOutcome::Failed { .. } | LinkOutcome::LaunchFailed
        )
    }

    /// Returns `true` if no unit failed and the link step did not fail.
    pub fn is_success(&self) -> bool {
        self.tally.errors == 0
            && !matches!(
                self.link,
                LinkOutcome::Failed { .. } | LinkOutcome::LaunchFailed
            )
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Outcome of a header check run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckSummary {
    /// Header counters.
    pub tally: Tally,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// `true` if the error ceiling cut the run short.
    pub stopped_early: bool,
}

impl CheckSummary {
    /// Returns `true` if every checked header compiled on its own.
    pub fn is_success(&self) -> bool {
        self.tally.errors == 0
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
