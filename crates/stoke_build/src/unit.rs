//! Build units and their toolchain roles.

use std::fmt;
use std::path::{Path, PathBuf};

use stoke_cache::normalize_key;
use stoke_config::{ProfileConfig, ToolchainConfig};
use stoke_toolchain::CompilerProfile;

/// Which compiler profile a unit is built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Compiled with the C profile.
    C,
    /// Compiled with the C++ profile.
    Cpp,
}

impl Role {
    /// Roles in processing order: all C units run before any C++ unit.
    pub const ALL: [Role; 2] = [Role::C, Role::Cpp];

    /// Selects this role's profile from the toolchain configuration.
    pub fn profile(self, toolchain: &ToolchainConfig) -> &ProfileConfig {
        match self {
            Role::C => &toolchain.c,
            Role::Cpp => &toolchain.cpp,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::C => f.write_str("C"),
            Role::Cpp => f.write_str("C++"),
        }
    }
}

/// One source file submitted to the toolchain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildUnit {
    /// Path of the source file as discovered.
    pub source: PathBuf,
    /// Snapshot key, relative to the source root.
    pub key: String,
    /// Profile the unit is compiled with.
    pub role: Role,
    /// Object file the compiler writes.
    pub object: PathBuf,
}

impl BuildUnit {
    /// Creates the unit for `source`, placing its object under `object_dir`.
    ///
    /// The object path mirrors the source layout: `sub/a.c` becomes
    /// `<object_dir>/sub/a.c.o`, so equal file names in different folders
    /// never collide.
    pub fn new(root: &Path, object_dir: &Path, source: PathBuf, role: Role) -> Self {
        let key = normalize_key(root, &source);
        let object = object_dir.join(format!("{key}.o"));
        Self {
            source,
            key,
            role,
            object,
        }
    }
}

/// Converts a configured profile into the toolchain's invocation profile.
pub fn compiler_profile(profile: &ProfileConfig) -> CompilerProfile {
    CompilerProfile {
        binary: profile.compiler.clone(),
        flag: profile.flag.clone(),
        include_dirs: profile.include_dirs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_mirrors_source_layout() {
        let root = Path::new("src");
        let unit = BuildUnit::new(
            root,
            Path::new("BUILD/obj"),
            PathBuf::from("src/sub/a.c"),
            Role::C,
        );
        assert_eq!(unit.key, "sub/a.c");
        assert_eq!(unit.object, Path::new("BUILD/obj").join("sub/a.c.o"));
    }

    #[test]
    fn same_stem_different_extension_do_not_collide() {
        let root = Path::new(".");
        let obj = Path::new("obj");
        let c = BuildUnit::new(root, obj, PathBuf::from("./x.c"), Role::C);
        let cpp = BuildUnit::new(root, obj, PathBuf::from("./x.cpp"), Role::Cpp);
        assert_ne!(c.object, cpp.object);
    }

    #[test]
    fn role_selects_profile() {
        let toolchain = ToolchainConfig::default();
        assert_eq!(Role::C.profile(&toolchain).compiler, "gcc");
        assert_eq!(Role::Cpp.profile(&toolchain).compiler, "g++");
        assert_eq!(Role::Cpp.to_string(), "C++");
    }

    #[test]
    fn compiler_profile_copies_settings() {
        let mut config = ProfileConfig::cpp();
        config.include_dirs.push(PathBuf::from("include"));
        let profile = compiler_profile(&config);
        assert_eq!(profile.binary, "g++");
        assert_eq!(profile.flag, "std=gnu++14");
        assert_eq!(profile.include_dirs, vec![PathBuf::from("include")]);
    }
}
