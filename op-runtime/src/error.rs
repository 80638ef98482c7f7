//! Framework errors: conditions that indicate a bug in the scheduler or
//! its caller, never a domain `Failure`. Surfaced as a `Result` the
//! caller `?`-propagates or panics on — not as an `Outcome`.

/// A fatal scheduler-level error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The stack's top entry was a `Handler` at the start of a step. A
    /// `Handler` is only ever installed beneath the child it is waiting
    /// on; finding one at the top means the scheduler itself is broken.
    #[error("internal scheduler error: a Handler (installed by `{parent_name}`) was at the top of the stack")]
    HandlerAtTopOfStack {
        /// The name of the Op that installed the stray handler.
        parent_name: String,
    },
    /// `run_step` was called with an empty stack; there is no work to do.
    #[error("run_step called with an empty stack")]
    EmptyStack,
    /// Assembling the I/O context from its configuration failed.
    #[error(transparent)]
    Io(#[from] op_io::AssembleError),
    /// Saving the recorded session on stack-empty (record mode) failed.
    #[error("failed to save session: {0}")]
    SessionSave(#[source] std::io::Error),
}
