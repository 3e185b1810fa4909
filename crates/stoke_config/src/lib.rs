//! Loading and validation of `stoke.toml` project configuration.
//!
//! This crate merges built-in defaults with an optional `stoke.toml` and
//! produces the strongly-typed [`ProjectConfig`] that the build core is
//! constructed with. Command-line overrides are applied by the caller.

#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, validate_config, CONFIG_FILE};
pub use resolve::apply_file;
pub use types::*;
