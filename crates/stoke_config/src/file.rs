//! The on-disk `stoke.toml` layout.
//!
//! Every field is optional: anything left out keeps the value it already has
//! in the [`ProjectConfig`](crate::ProjectConfig) it is applied to.

use std::path::PathBuf;

use serde::Deserialize;
use stoke_cache::MarkerKind;

/// Top-level `stoke.toml` document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[paths]` table.
    #[serde(default)]
    pub paths: PathsTable,
    /// `[build]` table.
    #[serde(default)]
    pub build: BuildTable,
    /// `[toolchain]` table with `c`, `cpp`, and `link` sub-tables.
    #[serde(default)]
    pub toolchain: ToolchainTable,
    /// `[check]` table.
    #[serde(default)]
    pub check: CheckTable,
}

/// `[paths]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsTable {
    /// Build folder.
    pub build: Option<PathBuf>,
    /// Source folder.
    pub source: Option<PathBuf>,
    /// Link output name.
    pub output: Option<String>,
}

/// `[build]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildTable {
    /// Error ceiling.
    pub max_errors: Option<usize>,
    /// Extra link inputs.
    pub libraries: Option<Vec<String>>,
    /// Marker kind (`"mtime"` or `"content"`).
    pub marker: Option<MarkerKind>,
}

/// `[toolchain]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainTable {
    /// `[toolchain.c]`
    #[serde(default)]
    pub c: ProfileTable,
    /// `[toolchain.cpp]`
    #[serde(default)]
    pub cpp: ProfileTable,
    /// `[toolchain.link]`
    #[serde(default)]
    pub link: LinkerTable,
}

/// `[toolchain.c]` / `[toolchain.cpp]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileTable {
    /// Compiler binary or `"none"`.
    pub compiler: Option<String>,
    /// Single free-form flag.
    pub flag: Option<String>,
    /// Handled extensions.
    pub extensions: Option<Vec<String>>,
    /// Extra include directories.
    pub include_dirs: Option<Vec<PathBuf>>,
}

/// `[toolchain.link]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkerTable {
    /// Linker binary.
    pub linker: Option<String>,
    /// Single free-form flag.
    pub flag: Option<String>,
}

/// `[check]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckTable {
    /// Compiler binary or `"none"`.
    pub compiler: Option<String>,
    /// Single free-form flag.
    pub flag: Option<String>,
    /// Header extensions.
    pub extensions: Option<Vec<String>>,
    /// Extra include directories.
    pub include_dirs: Option<Vec<PathBuf>>,
    /// Error ceiling for header checks.
    pub max_errors: Option<usize>,
}
