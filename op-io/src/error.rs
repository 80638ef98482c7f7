//! Errors raised while assembling an [`op_core::IoContext`] from an
//! [`op_core::IoConfig`]. These are caller-input problems — a bad config,
//! not a scheduler bug — so they are an ordinary `Result`, not a panic.

use std::path::PathBuf;

/// Why assembling an `IoContext` from an `IoConfig` failed.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// `Mode::Replay` was requested without a `session_file`.
    #[error("replay mode requires a session file")]
    MissingSessionFileForReplay,
    /// `Mode::Record` was requested without a `session_file`.
    #[error("record mode requires a session file")]
    MissingSessionFileForRecord,
    /// The session file for replay mode could not be read or parsed.
    #[error("failed to load session file {path}: {source}")]
    SessionLoad {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying I/O or parse error.
        #[source]
        source: std::io::Error,
    },
    /// The configured log file could not be opened for the tee sink.
    #[error("failed to open log file {path}: {source}")]
    LogFileOpen {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `Mode::Test` has no config-driven assembly; build an `IoContext`
    /// directly (see `op_core::test_utils`) instead of going through
    /// [`crate::assemble`].
    #[error("Mode::Test has no config-driven assembly")]
    UnsupportedTestMode,
}
