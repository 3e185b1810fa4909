//! Resolved configuration types handed to the build core.
//!
//! These are the values after defaults, `stoke.toml`, and command-line
//! overrides have been merged. The core only ever sees a [`ProjectConfig`].

use std::path::{Path, PathBuf};

use stoke_cache::MarkerKind;

/// Toolchain binary name that disables a profile.
pub const DISABLED_TOOL: &str = "none";

/// The complete configuration for one `stoke` invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// Build, source, and output locations.
    pub paths: PathsConfig,
    /// Error ceiling, link inputs, and marker selection for builds.
    pub build: BuildSettings,
    /// Compiler and linker profiles.
    pub toolchain: ToolchainConfig,
    /// Header self-containment check settings.
    pub check: CheckSettings,
    /// Per-invocation options that only come from the command line.
    pub run: RunOptions,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq)]
pub struct PathsConfig {
    /// Build folder holding object files, snapshots, and the linked artifact.
    pub build: PathBuf,
    /// Root of the source tree to walk.
    pub source: PathBuf,
    /// Name of the linked artifact inside the build folder.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build: PathBuf::from("BUILD"),
            source: PathBuf::from("."),
            output: "output".to_string(),
        }
    }
}

/// Settings for `stoke build`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSettings {
    /// Maximum number of failing units before the run stops; `0` means unlimited.
    pub max_errors: usize,
    /// Extra link inputs appended after the object files.
    pub libraries: Vec<String>,
    /// Which file property is used to detect changes.
    pub marker: MarkerKind,
}

/// Compile and link profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainConfig {
    /// Profile for C translation units.
    pub c: ProfileConfig,
    /// Profile for C++ translation units.
    pub cpp: ProfileConfig,
    /// The link step.
    pub link: LinkerConfig,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            c: ProfileConfig::c(),
            cpp: ProfileConfig::cpp(),
            link: LinkerConfig::default(),
        }
    }
}

/// A compiler profile selecting which files it handles and how they are compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Compiler binary, or `"none"` to disable the profile.
    pub compiler: String,
    /// Single free-form flag, passed as `-<flag>` when non-empty.
    pub flag: String,
    /// File extensions (without the dot) this profile compiles.
    pub extensions: Vec<String>,
    /// Additional include directories, each passed as `-I <dir>`.
    pub include_dirs: Vec<PathBuf>,
}

impl ProfileConfig {
    /// The default C profile (`gcc`, `.c` files).
    pub fn c() -> Self {
        Self {
            compiler: "gcc".to_string(),
            flag: String::new(),
            extensions: vec!["c".to_string()],
            include_dirs: Vec::new(),
        }
    }

    /// The default C++ profile (`g++ -std=gnu++14`, `.cpp` files).
    pub fn cpp() -> Self {
        Self {
            compiler: "g++".to_string(),
            flag: "std=gnu++14".to_string(),
            extensions: vec!["cpp".to_string()],
            include_dirs: Vec::new(),
        }
    }

    /// Returns `false` if the compiler is set to `"none"`.
    pub fn is_enabled(&self) -> bool {
        self.compiler != DISABLED_TOOL
    }

    /// Returns `true` if `path` has one of this profile's extensions.
    pub fn matches(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

/// The link step.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkerConfig {
    /// Linker binary.
    pub linker: String,
    /// Single free-form flag, passed as `-<flag>` when non-empty.
    pub flag: String,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            linker: "g++".to_string(),
            flag: String::new(),
        }
    }
}

/// Settings for `stoke check`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    /// Compiler used for the synthesized translation units, or `"none"`.
    pub compiler: String,
    /// Single free-form flag, passed as `-<flag>` when non-empty.
    pub flag: String,
    /// Header extensions (without the dot) to check.
    pub extensions: Vec<String>,
    /// Additional include directories besides the source root.
    pub include_dirs: Vec<PathBuf>,
    /// Maximum number of failing headers before the run stops; `0` means unlimited.
    pub max_errors: usize,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flag: "std=gnu++14".to_string(),
            extensions: vec!["h".to_string()],
            include_dirs: Vec::new(),
            max_errors: 0,
        }
    }
}

impl CheckSettings {
    /// Returns `false` if the compiler is set to `"none"`.
    pub fn is_enabled(&self) -> bool {
        self.compiler != DISABLED_TOOL
    }

    /// Returns `true` if `path` has one of the header extensions.
    pub fn matches(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

/// Options that are never read from `stoke.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Ignore the previous snapshot and start from an empty store.
    pub clean: bool,
    /// How much progress output to produce.
    pub verbosity: Verbosity,
    /// Check only this header, relative to the source folder.
    pub header: Option<PathBuf>,
}

/// Progress output level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only the run summary and warnings.
    Quiet,
    /// Per-unit progress lines.
    #[default]
    Normal,
    /// Progress lines plus skipped units.
    Verbose,
}

impl Verbosity {
    /// Derives the level from `--quiet` / `--verbose`; quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x == ext))
}
