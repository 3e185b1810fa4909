//! Header self-containment checks.
//!
//! Each header is compiled on its own through a synthetic translation unit
//! that includes it and defines an empty `main`. A header that needs another
//! include first fails this check.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use stoke_cache::{normalize_key, MarkerSource};
use stoke_config::ProjectConfig;
use stoke_toolchain::{CompilerProfile, Invocation, Toolchain};

use crate::error::BuildError;
use crate::report::{Action, BuildEvent, Reporter};
use crate::session::Session;
use crate::summary::{CheckSummary, ErrorCeiling};
use crate::walk::source_files;

/// Snapshot file for checked headers, inside the build folder.
pub const HEADER_TIMESTAMPS_FILE: &str = "header_timestamps.json";

const SCRATCH_PREFIX: &str = ".stoke-check-";
const SYNTHETIC_SOURCE: &str = "self_contained.cpp";
const SYNTHETIC_OBJECT: &str = "self_contained.o";

/// Checks that headers compile in isolation.
pub struct HeaderChecker<'a> {
    config: &'a ProjectConfig,
    toolchain: &'a dyn Toolchain,
    reporter: &'a dyn Reporter,
}

impl<'a> HeaderChecker<'a> {
    /// Creates a checker for `config`.
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

    /// Path of the header snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config.paths.build.join(HEADER_TIMESTAMPS_FILE)
    }

    /// Lists the headers to check.
    ///
    /// A single requested header is checked even if its extension is not
    /// configured. A disabled check compiler yields no headers.
    pub fn discover(&self) -> Result<Vec<PathBuf>, BuildError> {
        let check = &self.config.check;
        if !check.is_enabled() {
            return Ok(Vec::new());
        }
        let root = &self.config.paths.source;
        if let Some(header) = &self.config.run.header {
            return Ok(vec![root.join(header)]);
        }
        let files = source_files(root, std::slice::from_ref(&self.config.paths.build))?;
        Ok(files.into_iter().filter(|f| check.matches(f)).collect())
    }

    /// Runs one check pass.
    ///
    /// The synthetic unit lives in a scratch folder under the build folder
    /// that is removed when the run ends, including when the error ceiling
    /// stops it early.
    pub fn run(&self) -> Result<CheckSummary, BuildError> {
        let started = Instant::now();
        let build_dir = &self.config.paths.build;
        fs::create_dir_all(build_dir).map_err(|e| BuildError::CreateDir {
            path: build_dir.clone(),
            source: e,
        })?;

        let mut session = Session::open(
            self.snapshot_path(),
            self.config.run.clean,
            MarkerSource::new(self.config.build.marker),
            ErrorCeiling::new(self.config.check.max_errors),
            self.reporter,
        )?;

        let headers = self.discover()?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(build_dir)
            .map_err(|e| BuildError::Io {
                path: build_dir.clone(),
                source: e,
            })?;
        let unit_source = scratch.path().join(SYNTHETIC_SOURCE);
        let unit_object = scratch.path().join(SYNTHETIC_OBJECT);
        let profile = self.profile();
        tracing::info!(headers = headers.len(), scratch = %scratch.path().display(), "starting header check");

        let root = &self.config.paths.source;
        for header in &headers {
            let key = header_key(root, header);
            if session.begin(header, &key, Action::Check) {
                fs::write(&unit_source, synthetic_unit(&key)).map_err(|e| BuildError::Io {
                    path: unit_source.clone(),
                    source: e,
                })?;
                let invocation = Invocation::compile(&profile, &unit_source, &unit_object);
                let result = self.toolchain.run(&invocation);
                session.complete(header, &key, result);
            }
            if session.limit_reached() {
                break;
            }
        }

        let (tally, stopped_early) = session.finish()?;
        let scratch_path = scratch.path().to_path_buf();
        scratch.close().map_err(|e| BuildError::Io {
            path: scratch_path,
            source: e,
        })?;

        let summary = CheckSummary {
            tally,
            elapsed: started.elapsed(),
            stopped_early,
        };
        self.reporter.report(&BuildEvent::CheckFinished(&summary));
        Ok(summary)
    }

    /// The source root comes first on the include path so that
    /// `#include "<key>"` resolves.
    fn profile(&self) -> CompilerProfile {
        let check = &self.config.check;
        let mut include_dirs = vec![self.config.paths.source.clone()];
        include_dirs.extend(check.include_dirs.iter().cloned());
        CompilerProfile {
            binary: check.compiler.clone(),
            flag: check.flag.clone(),
            include_dirs,
        }
    }
}

/// Source text of the translation unit that checks `key`.
pub fn synthetic_unit(key: &str) -> String {
    format!("#include \"{key}\"\nint main() {{ return 0; }}\n")
}

/// Snapshot key of `header`.
///
/// Both paths are canonicalized first when they exist, so a header named
/// through `..` or a symlinked folder maps to the same key as the walk gives it.
fn header_key(root: &Path, header: &Path) -> String {
    match (root.canonicalize(), header.canonicalize()) {
        (Ok(root), Ok(header)) if header.starts_with(&root) => normalize_key(&root, &header),
        _ => normalize_key(root, header),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoke_config::DISABLED_TOOL;

    #[test]
    fn synthetic_unit_includes_header() {
        assert_eq!(
            synthetic_unit("sub/a.h"),
            "#include \"sub/a.h\"\nint main() { return 0; }\n"
        );
    }

    #[test]
    fn header_key_resolves_parent_components() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();

        let roundabout = dir.path().join("sub").join("..").join("a.h");
        assert_eq!(header_key(dir.path(), &roundabout), "a.h");
        assert_eq!(header_key(dir.path(), &dir.path().join("gone.h")), "gone.h");
    }

    #[test]
    fn header_key_with_relative_root_and_absolute_header() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(header_key(Path::new("."), &cwd.join("Cargo.toml")), "Cargo.toml");
    }

    struct NoTools;

    impl Toolchain for NoTools {
        fn run(
            &self,
            _: &Invocation,
        ) -> Result<stoke_toolchain::ToolStatus, stoke_toolchain::ToolchainError> {
            unreachable!("discovery never runs tools")
        }
    }

    struct Silent;

    impl Reporter for Silent {
        fn report(&self, _: &BuildEvent<'_>) {}
    }

    #[test]
    fn discovery_honors_single_header_and_disabled_compiler() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();
        fs::write(dir.path().join("b.h"), "").unwrap();
        fs::write(dir.path().join("c.c"), "").unwrap();

        let mut config = ProjectConfig::default();
        config.paths.source = dir.path().to_path_buf();
        config.paths.build = dir.path().join("BUILD");

        let checker = HeaderChecker::new(&config, &NoTools, &Silent);
        assert_eq!(
            checker.discover().unwrap(),
            vec![dir.path().join("a.h"), dir.path().join("b.h")]
        );

        config.run.header = Some(PathBuf::from("b.h"));
        let checker = HeaderChecker::new(&config, &NoTools, &Silent);
        assert_eq!(checker.discover().unwrap(), vec![dir.path().join("b.h")]);

        config.check.compiler = DISABLED_TOOL.to_string();
        let checker = HeaderChecker::new(&config, &NoTools, &Silent);
        assert!(checker.discover().unwrap().is_empty());
    }

    #[test]
    fn profile_puts_source_root_first() {
        let mut config = ProjectConfig::default();
        config.paths.source = PathBuf::from("src");
        config.check.include_dirs = vec![PathBuf::from("include")];
        let checker = HeaderChecker::new(&config, &NoTools, &Silent);
        let profile = checker.profile();
        assert_eq!(profile.binary, "g++");
        assert_eq!(
            profile.include_dirs,
            vec![PathBuf::from("src"), PathBuf::from("include")]
        );
    }
}
