//! Running invocations as child processes.

use std::process::{Command, Stdio};

use crate::error::ToolchainError;
use crate::invocation::Invocation;

/// Outcome of a toolchain run that did launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolStatus {
    /// Exit code 0; the requested output is valid.
    Success,
    /// Nonzero exit, or terminated by a signal (`code` is `None`).
    Failed {
        /// The exit code, if the process exited normally.
        code: Option<i32>,
    },
}

/// Executes toolchain invocations.
///
/// Implementations block until the tool finishes. The build core only relies
/// on the status: success means the invocation's output file is valid.
pub trait Toolchain {
    /// Runs `invocation` to completion.
    fn run(&self, invocation: &Invocation) -> Result<ToolStatus, ToolchainError>;
}

/// Runs invocations as child processes that inherit stdout and stderr.
///
/// Compiler diagnostics reach the terminal unfiltered while the tool runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessToolchain;

impl ProcessToolchain {
    /// Creates a process-backed toolchain.
    pub fn new() -> Self {
        Self
    }
}

impl Toolchain for ProcessToolchain {
    fn run(&self, invocation: &Invocation) -> Result<ToolStatus, ToolchainError> {
        tracing::debug!(command = %invocation, "launching toolchain");
        let status = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ToolchainError::Launch {
                program: invocation.program().to_string(),
                source: e,
            })?;

        tracing::debug!(program = invocation.program(), ?status, "toolchain finished");
        if status.success() {
            Ok(ToolStatus::Success)
        } else {
            Ok(ToolStatus::Failed {
                code: status.code(),
            })
        }
    }
}
