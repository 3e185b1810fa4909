//! External compiler and linker invocation.
//!
//! An [`Invocation`] is an owned argument vector built from a
//! [`CompilerProfile`] or [`LinkerProfile`]. A [`Toolchain`] runs it and
//! reports the outcome as a [`ToolStatus`]: a nonzero exit is a normal
//! [`ToolStatus::Failed`], while a binary that cannot be launched at all is a
//! [`ToolchainError`].

#![warn(missing_docs)]

pub mod error;
pub mod invocation;
pub mod runner;

pub use error::ToolchainError;
pub use invocation::{CompilerProfile, Invocation, LinkerProfile};
pub use runner::{ProcessToolchain, ToolStatus, Toolchain};
