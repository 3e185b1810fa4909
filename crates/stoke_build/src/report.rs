//! Progress events and the terminal reporter.
//!
//! The build core never prints. It emits [`BuildEvent`]s to a [`Reporter`];
//! [`TerminalReporter`] turns them into status lines on stderr, filtered by
//! [`Verbosity`].

use std::path::Path;

use stoke_cache::CacheError;
use stoke_config::Verbosity;
use stoke_toolchain::ToolchainError;

use crate::summary::{CheckSummary, LinkOutcome, RunSummary};

/// The kind of work done for a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Compiling a source file to an object.
    Compile,
    /// Compiling a header in isolation.
    Check,
}

/// Something observable that happened during a run.
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// The snapshot for this run is ready.
    SnapshotLoaded {
        /// The snapshot file.
        path: &'a Path,
        /// Number of entries it holds.
        entries: usize,
    },
    /// The snapshot was unreadable and the run starts from an empty one.
    SnapshotDiscarded {
        /// The snapshot file.
        path: &'a Path,
        /// Why it was discarded.
        error: &'a CacheError,
    },
    /// `--clean` removed object files left by earlier runs.
    ObjectsCleaned {
        /// Number of removed files.
        removed: usize,
    },
    /// A unit was unchanged since its last successful run.
    UnitSkipped {
        /// The unit's file.
        path: &'a Path,
    },
    /// A unit's tool is about to run.
    UnitStarted {
        /// The unit's file.
        path: &'a Path,
        /// What is being done.
        action: Action,
    },
    /// A unit's tool ran and failed.
    UnitFailed {
        /// The unit's file.
        path: &'a Path,
        /// The tool's exit code, if it exited normally.
        code: Option<i32>,
    },
    /// A unit's marker could not be read.
    MarkerUnavailable {
        /// The unit's file.
        path: &'a Path,
        /// The read failure.
        error: &'a CacheError,
    },
    /// A unit's tool could not be started.
    LaunchFailed {
        /// The unit's file.
        path: &'a Path,
        /// The launch failure.
        error: &'a ToolchainError,
    },
    /// The error ceiling stopped the run.
    CeilingReached {
        /// The configured limit.
        limit: usize,
    },
    /// The linker is about to run.
    Linking {
        /// The artifact being produced.
        artifact: &'a Path,
        /// Number of object files.
        inputs: usize,
    },
    /// The linker ran and failed.
    LinkFailed {
        /// The linker's exit code, if it exited normally.
        code: Option<i32>,
    },
    /// The linker could not be started.
    LinkLaunchFailed {
        /// The launch failure.
        error: &'a ToolchainError,
    },
    /// A build run completed.
    BuildFinished(&'a RunSummary),
    /// A header check run completed.
    CheckFinished(&'a CheckSummary),
}

/// Receives progress events from a run.
pub trait Reporter {
    /// Handles one event.
    fn report(&self, event: &BuildEvent<'_>);
}

/// Writes status lines to stderr.
#[derive(Clone, Copy, Debug)]
pub struct TerminalReporter {
    verbosity: Verbosity,
}

impl TerminalReporter {
    /// Creates a reporter that prints events at or below `verbosity`.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Renders `event` as a status line, or `None` if it is filtered out.
    pub fn render(&self, event: &BuildEvent<'_>) -> Option<String> {
        if level(event) > self.verbosity {
            return None;
        }
        let line = match event {
            BuildEvent::SnapshotLoaded { path, entries } => {
                format!("   Snapshot {} ({entries} entries)", path.display())
            }
            BuildEvent::SnapshotDiscarded { path, error } => format!(
                "warning: ignoring unreadable snapshot {}: {error}; rebuilding everything",
                path.display()
            ),
            BuildEvent::ObjectsCleaned { removed } => {
                format!("    Cleaned {removed} object file(s)")
            }
            BuildEvent::UnitSkipped { path } => {
                format!("   Skipping {} (unchanged)", path.display())
            }
            BuildEvent::UnitStarted { path, action } => match action {
                Action::Compile => format!("  Compiling {}", path.display()),
                Action::Check => format!("   Checking {}", path.display()),
            },
            BuildEvent::UnitFailed { path, code } => {
                format!("error: {} failed{}", path.display(), exit_suffix(*code))
            }
            BuildEvent::MarkerUnavailable { path, error } => {
                format!("error: cannot read {}: {error}", path.display())
            }
            BuildEvent::LaunchFailed { path, error } => format!(
                "error: {} could not be processed: {error} (is the toolchain installed?)",
                path.display()
            ),
            BuildEvent::CeilingReached { limit } => {
                format!("error: stopping after {limit} error(s)")
            }
            BuildEvent::Linking { artifact, inputs } => {
                format!("    Linking {} ({inputs} object(s))", artifact.display())
            }
            BuildEvent::LinkFailed { code } => {
                format!("error: linking failed{}", exit_suffix(*code))
            }
            BuildEvent::LinkLaunchFailed { error } => {
                format!("error: linking failed: {error} (is the toolchain installed?)")
            }
            BuildEvent::BuildFinished(summary) => render_build_summary(summary),
            BuildEvent::CheckFinished(summary) => render_check_summary(summary),
        };
        Some(line)
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, event: &BuildEvent<'_>) {
        if let Some(line) = self.render(event) {
            eprintln!("{line}");
        }
    }
}

fn level(event: &BuildEvent<'_>) -> Verbosity {
    match event {
        BuildEvent::SnapshotLoaded { .. }
        | BuildEvent::UnitSkipped { .. }
        | BuildEvent::ObjectsCleaned { .. } => Verbosity::Verbose,
        BuildEvent::UnitStarted { .. }
        | BuildEvent::UnitFailed { .. }
        | BuildEvent::Linking { .. } => Verbosity::Normal,
        _ => Verbosity::Quiet,
    }
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {code})"),
        None => " (terminated by signal)".to_string(),
    }
}

fn render_build_summary(summary: &RunSummary) -> String {
    let tally = &summary.tally;
    let secs = summary.elapsed.as_secs_f64();
    let mut line = match summary.link {
        LinkOutcome::NoChanges => format!(
            "   Finished in {secs:.2}s: no changes ({} file(s) up to date)",
            tally.skipped
        ),
        LinkOutcome::Linked => format!(
            "   Finished in {secs:.2}s: {} compiled, {} skipped",
            tally.processed, tally.skipped
        ),
        LinkOutcome::SkippedErrors => format!(
            "   Finished with errors in {secs:.2}s: {} of {} compiled file(s) failed, {} skipped",
            tally.errors, tally.processed, tally.skipped
        ),
        LinkOutcome::Failed { .. } | LinkOutcome::LaunchFailed => format!(
            "   Finished with link errors in {secs:.2}s: {} compiled, {} skipped",
            tally.processed, tally.skipped
        ),
    };
    if tally.launch_failures > 0 {
        line.push_str(&format!(
            "; the compiler could not be launched for {} file(s)",
            tally.launch_failures
        ));
    }
    if summary.stopped_early {
        line.push_str("; stopped at the error limit");
    }
    line
}

fn render_check_summary(summary: &CheckSummary) -> String {
    let tally = &summary.tally;
    format!(
        "Checked {} files and skipped {} files in {:.2} seconds. Found errors in {}/{} files.",
        tally.processed,
        tally.skipped,
        summary.elapsed.as_secs_f64(),
        tally.errors,
        tally.total()
    )
}
