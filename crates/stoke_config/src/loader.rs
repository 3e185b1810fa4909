//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::file::ConfigFile;
use crate::resolve::apply_file;
use crate::types::{ProjectConfig, DISABLED_TOOL};

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "stoke.toml";

/// Loads the configuration for the project in `project_dir`.
///
/// Reads `<project_dir>/stoke.toml` if it exists; otherwise returns the
/// built-in defaults.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    if config_path.is_file() {
        load_config_file(&config_path)
    } else {
        Ok(ProjectConfig::default())
    }
}

/// Loads configuration from an explicit file path, which must exist.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `stoke.toml` document over the built-in defaults.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let mut config = ProjectConfig::default();
    apply_file(&mut config, file);
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required values are present and consistent.
///
/// Call again after applying command-line overrides.
pub fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.paths.build.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("paths.build".to_string()));
    }
    if config.paths.output.is_empty() {
        return Err(ConfigError::MissingField("paths.output".to_string()));
    }
    for (name, profile) in [
        ("toolchain.c", &config.toolchain.c),
        ("toolchain.cpp", &config.toolchain.cpp),
    ] {
        if profile.compiler.is_empty() {
            return Err(ConfigError::MissingField(format!("{name}.compiler")));
        }
        if profile.is_enabled() && profile.extensions.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{name} is enabled but lists no extensions"
            )));
        }
    }
    if config.toolchain.link.linker.is_empty() {
        return Err(ConfigError::MissingField("toolchain.link.linker".to_string()));
    }
    if config.toolchain.link.linker == DISABLED_TOOL {
        return Err(ConfigError::ValidationError(
            "the link step cannot be disabled".to_string(),
        ));
    }
    if config.check.compiler.is_empty() {
        return Err(ConfigError::MissingField("check.compiler".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verbosity;
    use std::path::PathBuf;
    use stoke_cache::MarkerKind;

    #[test]
    fn empty_document_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[paths]
build = "out"
source = "src"
output = "app"

[build]
max_errors = 3
libraries = ["-lm", "vendor/libfoo.a"]
marker = "content"

[toolchain.c]
compiler = "clang"
flag = "std=c11"
extensions = ["c"]
include_dirs = ["include"]

[toolchain.cpp]
compiler = "none"

[toolchain.link]
linker = "clang"
flag = "fuse-ld=lld"

[check]
compiler = "clang++"
flag = "std=c++17"
extensions = ["h", "hpp"]
max_errors = 1
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.build, PathBuf::from("out"));
        assert_eq!(config.paths.source, PathBuf::from("src"));
        assert_eq!(config.paths.output, "app");
        assert_eq!(config.build.max_errors, 3);
        assert_eq!(config.build.libraries.len(), 2);
        assert_eq!(config.build.marker, MarkerKind::Content);
        assert_eq!(config.toolchain.c.compiler, "clang");
        assert_eq!(config.toolchain.c.include_dirs, vec![PathBuf::from("include")]);
        assert!(!config.toolchain.cpp.is_enabled());
        assert_eq!(config.toolchain.link.flag, "fuse-ld=lld");
        assert_eq!(config.check.extensions, vec!["h", "hpp"]);
        assert_eq!(config.check.max_errors, 1);
        assert_eq!(config.run.verbosity, Verbosity::Normal);
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_key_errors() {
        let err = load_config_from_str("[paths]\nbiuld = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn bad_marker_kind_errors() {
        let err = load_config_from_str("[build]\nmarker = \"sha\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_output_name_errors() {
        let err = load_config_from_str("[paths]\noutput = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn enabled_profile_without_extensions_errors() {
        let err = load_config_from_str("[toolchain.c]\nextensions = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn disabled_profile_without_extensions_is_fine() {
        let config =
            load_config_from_str("[toolchain.c]\ncompiler = \"none\"\nextensions = []\n").unwrap();
        assert!(!config.toolchain.c.is_enabled());
    }

    #[test]
    fn disabled_linker_errors() {
        let err = load_config_from_str("[toolchain.link]\nlinker = \"none\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_project_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn project_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[paths]\noutput = \"game\"\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.paths.output, "game");
    }

    #[test]
    fn explicit_missing_file_errors() {
        let err = load_config_file(Path::new("/nonexistent/stoke.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
