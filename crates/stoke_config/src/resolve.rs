//! Merging a parsed `stoke.toml` over an existing configuration.

use crate::file::{CheckTable, ConfigFile, LinkerTable, ProfileTable};
use crate::types::{CheckSettings, LinkerConfig, ProfileConfig, ProjectConfig};

/// Applies every value present in `file` on top of `config`.
///
/// Fields absent from the file leave `config` untouched, so applying an empty
/// file is a no-op.
pub fn apply_file(config: &mut ProjectConfig, file: ConfigFile) {
    let ConfigFile {
        paths,
        build,
        toolchain,
        check,
    } = file;

    set(&mut config.paths.build, paths.build);
    set(&mut config.paths.source, paths.source);
    set(&mut config.paths.output, paths.output);

    set(&mut config.build.max_errors, build.max_errors);
    set(&mut config.build.libraries, build.libraries);
    set(&mut config.build.marker, build.marker);

    apply_profile(&mut config.toolchain.c, toolchain.c);
    apply_profile(&mut config.toolchain.cpp, toolchain.cpp);
    apply_linker(&mut config.toolchain.link, toolchain.link);
    apply_check(&mut config.check, check);
}

fn apply_profile(profile: &mut ProfileConfig, table: ProfileTable) {
    set(&mut profile.compiler, table.compiler);
    set(&mut profile.flag, table.flag);
    set(&mut profile.extensions, table.extensions);
    set(&mut profile.include_dirs, table.include_dirs);
}

fn apply_linker(link: &mut LinkerConfig, table: LinkerTable) {
    set(&mut link.linker, table.linker);
    set(&mut link.flag, table.flag);
}

fn apply_check(check: &mut CheckSettings, table: CheckTable) {
    set(&mut check.compiler, table.compiler);
    set(&mut check.flag, table.flag);
    set(&mut check.extensions, table.extensions);
    set(&mut check.include_dirs, table.include_dirs);
    set(&mut check.max_errors, table.max_errors);
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
