//! # op-core — the Op contract and Outcome algebra
//!
//! An interactive CLI built on this crate is a tree of small,
//! strongly-typed units of work called **Ops**. Each Op performs one
//! bounded task and yields an [`Outcome`] — a typed success value or a
//! tagged failure. Ops compose by returning other Ops, either as a tail
//! call (the parent is discarded) or as a delegate-with-continuation
//! pair (the parent is replaced by a handler and resumed once the child
//! finishes). A single-stack scheduler (`op-runtime`) drains this
//! composition to completion.
//!
//! ## The Modules
//!
//! | Module | What it does |
//! |--------|---------------|
//! | [`outcome`] | The Success/Failure algebra and the [`FailureTag`] contract every Op's failure enum implements. |
//! | [`op`] | The [`Op`] trait, [`StepValue`], and the free functions Ops use to build outcomes. |
//! | [`erased`] | The type-erasure boundary ([`DynOp`]) that lets Ops of differing `Success`/`Failure` types share one heterogeneous scheduler stack. |
//! | [`io`] | The shape of the pluggable I/O context ([`IoContext`], [`Mode`], [`IoConfig`]) every Op's `run` receives. |
//! | [`duration`] | A stable-wire-format millisecond duration, shared by session timestamps and step timing. |
//! | [`test_utils`] | In-process test doubles ([`test_utils::EchoOp`], a scripted `IoContext`), feature-gated for downstream use. |
//!
//! ## Dependency Notes
//!
//! Concrete Ops, and the scheduler itself, depend only on this crate's
//! public surface — never on each other's internals. This mirrors the
//! dependency order `Outcome <- Op <- I/O context <- OpRunner`: the
//! scheduler, the concrete I/O implementations (live terminal,
//! recordable/replayable input, tee output), and a runnable demo live in
//! sibling crates (`op-runtime`, `op-io`, `demos/greeter`).
//!
//! ## Future: Native Async Traits
//!
//! [`Op::run`] and the other async traits here use `async-trait`
//! (heap-allocated futures). When Rust stabilizes `async fn in dyn Trait`
//! with `Send` bounds, these will migrate to native async — a breaking
//! change reserved for a pre-1.0 minor bump.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod duration;
pub mod erased;
pub mod io;
pub mod op;
pub mod outcome;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports for convenience
pub use duration::DurationMs;
pub use erased::{BoxedDynOp, DynOp, ErasedHandler, ErasedOutcome, ErasedStep};
pub use io::{InputSource, IoConfig, IoContext, Mode, OutputSink, ReplayControl, SessionRecorder};
pub use op::{
    cancel, fail, fail_with_unknown_error, handle_outcome, handle_outcome_default, succeed,
    tail_call, Op, StepValue,
};
pub use outcome::{CoreFailure, FailureTag, Outcome};
