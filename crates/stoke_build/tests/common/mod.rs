//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use stoke_build::{BuildEvent, Reporter};
use stoke_cache::MarkerKind;
use stoke_config::ProjectConfig;
use stoke_toolchain::{Invocation, ToolStatus, Toolchain, ToolchainError};

/// A toolchain that never spawns a process.
///
/// A compile fails if its input, or a header it includes via `#include "..."`
/// from its own folder or one of its `-I` folders, contains `#error` or cannot
/// be found. A link fails if any input file is missing. Successful runs write
/// the output file.
#[derive(Default)]
pub struct FakeToolchain {
    calls: RefCell<Vec<Invocation>>,
    missing: HashSet<String>,
    failing: HashSet<String>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `program` behave as if it were not installed.
    pub fn without(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Makes every invocation of `program` exit with code 1.
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.insert(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Inputs of the compile invocations so far, in order.
    pub fn compiled(&self) -> Vec<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.input().map(Path::to_path_buf))
            .collect()
    }

    /// Link invocations so far.
    pub fn links(&self) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.input().is_none())
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Toolchain for FakeToolchain {
    fn run(&self, invocation: &Invocation) -> Result<ToolStatus, ToolchainError> {
        self.calls.borrow_mut().push(invocation.clone());
        if self.missing.contains(invocation.program()) {
            return Err(ToolchainError::Launch {
                program: invocation.program().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }

        if self.failing.contains(invocation.program()) {
            return Ok(ToolStatus::Failed { code: Some(1) });
        }
        let ok = match invocation.input() {
            Some(input) => compiles(input, &include_dirs(invocation)),
            None => link_inputs(invocation).iter().all(|p| p.exists()),
        };
        if !ok {
            return Ok(ToolStatus::Failed { code: Some(1) });
        }
        fs::write(invocation.output(), "fake output").unwrap();
        Ok(ToolStatus::Success)
    }
}

fn include_dirs(invocation: &Invocation) -> Vec<PathBuf> {
    let args = invocation.args();
    args.iter()
        .enumerate()
        .filter(|(_, a)| a.as_os_str() == OsStr::new("-I"))
        .filter_map(|(i, _)| args.get(i + 1).map(PathBuf::from))
        .collect()
}

fn link_inputs(invocation: &Invocation) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    let mut args = invocation.args().iter();
    while let Some(arg) = args.next() {
        if arg.as_os_str() == OsStr::new("-o") {
            args.next();
        } else if !arg.to_string_lossy().starts_with('-') {
            inputs.push(PathBuf::from(arg));
        }
    }
    inputs
}

fn compiles(input: &Path, include_dirs: &[PathBuf]) -> bool {
    let Ok(text) = fs::read_to_string(input) else {
        return false;
    };
    if text.contains("#error") {
        return false;
    }
    for line in text.lines() {
        let Some(rest) = line.trim().strip_prefix("#include \"") else {
            continue;
        };
        let Some(name) = rest.strip_suffix('"') else {
            continue;
        };
        let found = input
            .parent()
            .into_iter()
            .chain(include_dirs.iter().map(PathBuf::as_path))
            .map(|d| d.join(name))
            .find(|p| p.is_file());
        match found {
            Some(header) => {
                if !compiles(&header, include_dirs) {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

/// Records a short tag per event.
#[derive(Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn has(&self, tag: &str) -> bool {
        self.events.borrow().iter().any(|e| e == tag)
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &BuildEvent<'_>) {
        let tag = match event {
            BuildEvent::SnapshotLoaded { .. } => "snapshot-loaded",
            BuildEvent::SnapshotDiscarded { .. } => "snapshot-discarded",
            BuildEvent::ObjectsCleaned { .. } => "objects-cleaned",
            BuildEvent::UnitSkipped { .. } => "skipped",
            BuildEvent::UnitStarted { .. } => "started",
            BuildEvent::UnitFailed { .. } => "failed",
            BuildEvent::MarkerUnavailable { .. } => "marker-unavailable",
            BuildEvent::LaunchFailed { .. } => "launch-failed",
            BuildEvent::CeilingReached { .. } => "ceiling",
            BuildEvent::Linking { .. } => "linking",
            BuildEvent::LinkFailed { .. } => "link-failed",
            BuildEvent::LinkLaunchFailed { .. } => "link-launch-failed",
            BuildEvent::BuildFinished(_) => "build-finished",
            BuildEvent::CheckFinished(_) => "check-finished",
        };
        self.events.borrow_mut().push(tag.to_string());
    }
}

/// A project rooted at `root` with sources in `root/src` and content markers.
pub fn project(root: &Path) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    config.paths.source = root.join("src");
    config.paths.build = root.join("BUILD");
    config.paths.output = "app".to_string();
    config.build.marker = MarkerKind::Content;
    fs::create_dir_all(&config.paths.source).unwrap();
    config
}

/// Writes `content` to `rel` below the project's source folder.
pub fn write_source(config: &ProjectConfig, rel: &str, content: &str) -> PathBuf {
    let path = config.paths.source.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
