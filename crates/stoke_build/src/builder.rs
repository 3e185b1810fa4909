//! The incremental build orchestrator.
//!
//! A run loads the compile snapshot, discovers units, compiles the stale ones
//! and links the program when something changed and nothing failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use stoke_cache::MarkerSource;
use stoke_config::ProjectConfig;
use stoke_toolchain::{Invocation, LinkerProfile, ToolStatus, Toolchain};

use crate::error::BuildError;
use crate::report::{Action, BuildEvent, Reporter};
use crate::session::Session;
use crate::summary::{ErrorCeiling, LinkOutcome, RunSummary, Tally};
use crate::unit::{compiler_profile, BuildUnit, Role};
use crate::walk::source_files;

/// Snapshot file for compiled units, inside the build folder.
pub const TIMESTAMPS_FILE: &str = "timestamps.json";

/// Object folder, inside the build folder.
pub const OBJECT_DIR: &str = "obj";

/// Compiles stale units and links the result.
pub struct Builder<'a> {
    config: &'a ProjectConfig,
    toolchain: &'a dyn Toolchain,
    reporter: &'a dyn Reporter,
}

impl<'a> Builder<'a> {
    /// Creates a builder for `config`.
    pub fn new(
        config: &'a ProjectConfig,
        toolchain: &'a dyn Toolchain,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            toolchain,
            reporter,
        }
    }

    /// Path of the compile snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config.paths.build.join(TIMESTAMPS_FILE)
    }

    /// Folder receiving object files.
    pub fn object_dir(&self) -> PathBuf {
        self.config.paths.build.join(OBJECT_DIR)
    }

    /// Path of the linked program.
    pub fn artifact_path(&self) -> PathBuf {
        let mut name = self.config.paths.output.clone();
        if cfg!(windows) && Path::new(&name).extension().is_none() {
            name.push_str(".exe");
        }
        self.config.paths.build.join(name)
    }

    /// Lists the units of the source tree.
    ///
    /// Every C unit comes before every C++ unit; within a role, units follow
    /// sorted walk order. Files of a disabled profile, and files no profile
    /// claims, are left out.
    pub fn discover(&self) -> Result<Vec<BuildUnit>, BuildError> {
        let root = &self.config.paths.source;
        let files = source_files(root, std::slice::from_ref(&self.config.paths.build))?;
        let object_dir = self.object_dir();

        let mut units = Vec::new();
        for role in Role::ALL {
            let profile = role.profile(&self.config.toolchain);
            if !profile.is_enabled() {
                tracing::debug!(%role, "profile disabled");
                continue;
            }
            units.extend(
                files
                    .iter()
                    .filter(|f| profile.matches(f))
                    .map(|f| BuildUnit::new(root, &object_dir, f.clone(), role)),
            );
        }
        Ok(units)
    }

    /// Runs one build.
    ///
    /// Compile failures do not abort the run; they are counted in the returned
    /// summary. Only failures to manage the build folder or the snapshot are
    /// returned as errors.
    pub fn run(&self) -> Result<RunSummary, BuildError> {
        let started = Instant::now();
        let build_dir = &self.config.paths.build;
        fs::create_dir_all(build_dir).map_err(|e| BuildError::CreateDir {
            path: build_dir.clone(),
            source: e,
        })?;

        let clean = self.config.run.clean;
        if clean {
            let removed = self.clean_objects()?;
            self.reporter.report(&BuildEvent::ObjectsCleaned { removed });
        }

        let mut session = Session::open(
            self.snapshot_path(),
            clean,
            MarkerSource::new(self.config.build.marker),
            ErrorCeiling::new(self.config.build.max_errors),
            self.reporter,
        )?;

        let units = self.discover()?;
        tracing::info!(units = units.len(), "starting build");
        for unit in &units {
            if session.begin(&unit.source, &unit.key, Action::Compile) {
                if let Some(parent) = unit.object.parent() {
                    fs::create_dir_all(parent).map_err(|e| BuildError::CreateDir {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
                let profile = compiler_profile(unit.role.profile(&self.config.toolchain));
                let invocation = Invocation::compile(&profile, &unit.source, &unit.object);
                let result = self.toolchain.run(&invocation);
                session.complete(&unit.source, &unit.key, result);
            }
            if session.limit_reached() {
                break;
            }
        }

        let (tally, stopped_early) = session.finish()?;
        let link = self.link(&units, &tally);
        let summary = RunSummary {
            tally,
            elapsed: started.elapsed(),
            link,
            stopped_early,
        };
        self.reporter.report(&BuildEvent::BuildFinished(&summary));
        Ok(summary)
    }

    fn link(&self, units: &[BuildUnit], tally: &Tally) -> LinkOutcome {
        if tally.errors > 0 {
            return LinkOutcome::SkippedErrors;
        }
        if tally.processed == 0 {
            return LinkOutcome::NoChanges;
        }

        let artifact = self.artifact_path();
        let inputs: Vec<PathBuf> = units.iter().map(|u| u.object.clone()).collect();
        let link = &self.config.toolchain.link;
        let profile = LinkerProfile {
            binary: link.linker.clone(),
            flag: link.flag.clone(),
        };
        let invocation =
            Invocation::link(&profile, &inputs, &artifact, &self.config.build.libraries);

        self.reporter.report(&BuildEvent::Linking {
            artifact: &artifact,
            inputs: inputs.len(),
        });
        match self.toolchain.run(&invocation) {
            Ok(ToolStatus::Success) => LinkOutcome::Linked,
            Ok(ToolStatus::Failed { code }) => {
                self.reporter.report(&BuildEvent::LinkFailed { code });
                LinkOutcome::Failed { code }
            }
            Err(error) => {
                tracing::error!(%error, "linker launch failed");
                self.reporter
                    .report(&BuildEvent::LinkLaunchFailed { error: &error });
                LinkOutcome::LaunchFailed
            }
        }
    }

    /// Removes `*.o` files left under the object folder.
    fn clean_objects(&self) -> Result<usize, BuildError> {
        let object_dir = self.object_dir();
        if !object_dir.is_dir() {
            return Ok(0);
        }
        let mut removed = 0;
        for path in source_files(&object_dir, &[])? {
            if path.extension().is_some_and(|ext| ext == "o") {
                fs::remove_file(&path).map_err(|e| BuildError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
        tracing::debug!(removed, dir = %object_dir.display(), "cleaned objects");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoke_config::DISABLED_TOOL;

    fn config(root: &Path) -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.paths.source = root.to_path_buf();
        config.paths.build = root.join("BUILD");
        config
    }

    struct NoTools;

    impl Toolchain for NoTools {
        fn run(&self, _: &Invocation) -> Result<ToolStatus, stoke_toolchain::ToolchainError> {
            unreachable!("discovery never runs tools")
        }
    }

    struct Silent;

    impl Reporter for Silent {
        fn report(&self, _: &BuildEvent<'_>) {}
    }

    #[test]
    fn discovers_c_before_cpp_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.cpp"), "").unwrap();
        fs::write(root.join("b.c"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("z.c"), "").unwrap();
        fs::create_dir_all(root.join("BUILD")).unwrap();
        fs::write(root.join("BUILD").join("gen.c"), "").unwrap();

        let config = config(root);
        let builder = Builder::new(&config, &NoTools, &Silent);
        let keys: Vec<_> = builder
            .discover()
            .unwrap()
            .into_iter()
            .map(|u| (u.key, u.role))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("b.c".to_string(), Role::C),
                ("z.c".to_string(), Role::C),
                ("a.cpp".to_string(), Role::Cpp),
            ]
        );
    }

    #[test]
    fn disabled_profile_contributes_no_units() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.c"), "").unwrap();
        fs::write(dir.path().join("b.cpp"), "").unwrap();
        let mut config = config(dir.path());
        config.toolchain.c.compiler = DISABLED_TOOL.to_string();

        let builder = Builder::new(&config, &NoTools, &Silent);
        let units = builder.discover().unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].role, Role::Cpp);
    }

    #[test]
    fn artifact_lives_in_build_folder() {
        let config = config(Path::new("proj"));
        let builder = Builder::new(&config, &NoTools, &Silent);
        let expected = if cfg!(windows) { "output.exe" } else { "output" };
        assert_eq!(builder.artifact_path(), Path::new("proj/BUILD").join(expected));
        assert_eq!(
            builder.snapshot_path(),
            Path::new("proj/BUILD").join("timestamps.json")
        );
    }
}
