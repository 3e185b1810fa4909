//! Error types for toolchain invocation.

/// Errors that prevent a toolchain process from running at all.
///
/// A compile error is not represented here; it is a
/// [`ToolStatus::Failed`](crate::ToolStatus::Failed) outcome.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The binary could not be launched (missing, not executable, ...).
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        /// The program that could not be started.
        program: String,
        /// The underlying I/O error from the spawn.
        source: std::io::Error,
    },
}
