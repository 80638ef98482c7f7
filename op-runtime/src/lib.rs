//! # op-runtime — the OpRunner scheduler
//!
//! A single-stack cooperative scheduler that drives [`op_core::Op`]s to
//! completion. One step is one state transition: run the Op at the top
//! of the stack, then apply exactly one of three mutations depending on
//! what it returned —
//!
//! - a tail call replaces the top slot with the returned Op (the current
//!   Op is discarded, can't be resumed);
//! - a delegate-with-continuation installs a handler in the current Op's
//!   place and pushes the child above it;
//! - anything else (a plain value, or any failure) pops the slot and, if
//!   a handler is waiting beneath it, invokes that handler exactly once
//!   with the popped outcome.
//!
//! | Module | What it does |
//! |--------|---------------|
//! | [`runner`] | [`runner::OpRunner`] itself — `run`/`run_step`, the replay-start and save-on-empty lifecycle hooks. |
//! | [`stack`] | [`stack::StackEntry`] — the heterogeneous Op-or-Handler stack slot. |
//! | [`observer`] | [`observer::StepObserver`]/[`observer::StepReport`] and the built-in [`observer::TracingObserver`]. |
//! | [`error`] | [`error::SchedulerError`] — fatal, caller-propagated framework errors. |
//!
//! A `Handler` at the top of the stack at the start of a step, or a
//! handler that panics, are both framework bugs: the former surfaces as
//! [`error::SchedulerError::HandlerAtTopOfStack`]; the latter is an
//! ordinary Rust panic that unwinds out of [`runner::OpRunner::run`]
//! uncaught — this scheduler does not catch handler panics and convert
//! them to a `Failure`, by deliberate design choice.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod observer;
pub mod runner;
pub mod stack;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::SchedulerError;
pub use observer::{StepObserver, StepReport, TracingObserver};
pub use runner::{OpRunner, StepOutcome, REPLAY_STARTUP_DELAY_MS};
pub use stack::StackEntry;
