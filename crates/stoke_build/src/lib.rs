//! Incremental compilation for Stoke.
//!
//! [`Builder`] compiles the C and C++ files of a source tree whose markers
//! changed since their last successful compile and links the program when
//! anything was rebuilt without errors. [`HeaderChecker`] applies the same
//! incremental machinery to verify that headers compile on their own.
//!
//! Both are constructed from a resolved [`stoke_config::ProjectConfig`], run
//! tools through a [`stoke_toolchain::Toolchain`], and report progress to a
//! [`Reporter`].

#![warn(missing_docs)]

pub mod builder;
pub mod checker;
pub mod error;
pub mod report;
mod session;
pub mod summary;
pub mod unit;
pub mod walk;

pub use builder::{Builder, OBJECT_DIR, TIMESTAMPS_FILE};
pub use checker::{HeaderChecker, HEADER_TIMESTAMPS_FILE};
pub use error::BuildError;
pub use report::{Action, BuildEvent, Reporter, TerminalReporter};
pub use summary::{CheckSummary, ErrorCeiling, LinkOutcome, RunSummary, Tally, UnitStatus};
pub use unit::{BuildUnit, Role};
