//! Type-erasure boundary: lets statically-typed [`Op`](crate::op::Op)
//! implementations of differing `Success`/`Failure` types share one
//! heterogeneous scheduler stack.
//!
//! Concrete Op authors never touch this module directly — they write
//! against [`crate::op::Op`] and the free functions in [`crate::op`].
//! `op-runtime` is the only other crate that reaches in here.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use crate::io::IoContext;
use crate::op::{Op, StepValue};
use crate::outcome::{FailureTag, Outcome};

/// A boxed, type-erased Op ready to sit on the scheduler's stack.
pub type BoxedDynOp = Box<dyn DynOp>;

/// A boxed, type-erased handler: consumes the child's erased outcome and
/// produces the next Op to run. Invoked at most once.
pub type ErasedHandler = Box<dyn FnOnce(ErasedOutcome) -> BoxedDynOp + Send>;

/// An [`Outcome`] with both its success payload and failure tag boxed as
/// `Any`, so the scheduler can hold and forward it without knowing either
/// concrete type.
pub enum ErasedOutcome {
    /// A terminal success payload, still boxed.
    Success(Box<dyn Any + Send>),
    /// A failure, with the fields every handler needs regardless of the
    /// concrete tag type (`canceled`, `display`) carried alongside the
    /// boxed tag itself for handlers that downcast back to it.
    Failure {
        /// Whether the boxed tag is the distinguished "canceled" tag.
        canceled: bool,
        /// `Display` rendering of the tag, captured before erasure.
        display: String,
        /// The Op's free-form debug string, if any.
        debug: Option<String>,
        /// The original failure tag, boxed.
        tag: Box<dyn Any + Send>,
    },
}

impl fmt::Debug for ErasedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErasedOutcome::Success(_) => write!(f, "ErasedOutcome::Success(..)"),
            ErasedOutcome::Failure { canceled, display, .. } => f
                .debug_struct("ErasedOutcome::Failure")
                .field("canceled", canceled)
                .field("display", display)
                .finish(),
        }
    }
}

/// What a step of an erased Op yields to the scheduler — the erased
/// counterpart of [`StepValue`].
pub enum ErasedStep {
    /// Tail call: replace this stack slot with the boxed Op.
    Tail(BoxedDynOp),
    /// Delegate-with-continuation: install the handler, push the child.
    Push(BoxedDynOp, ErasedHandler),
    /// `run` is finished; here is its erased outcome.
    Terminal(ErasedOutcome),
}

/// Object-safe counterpart of [`Op`]. Blanket-implemented for every
/// `T: Op` — never implemented by hand.
#[async_trait]
pub trait DynOp: Send + Sync {
    /// Stable name, forwarded from the concrete Op.
    fn name(&self) -> &str;

    /// Run the Op and erase its outcome for the scheduler.
    async fn run_erased(&self, io: &mut IoContext) -> ErasedStep;
}

#[async_trait]
impl<T: Op> DynOp for T {
    fn name(&self) -> &str {
        Op::name(self)
    }

    async fn run_erased(&self, io: &mut IoContext) -> ErasedStep {
        match Op::run(self, io).await {
            Outcome::Success(StepValue::Value(v)) => {
                ErasedStep::Terminal(ErasedOutcome::Success(Box::new(v)))
            }
            Outcome::Success(StepValue::Tail(next)) => ErasedStep::Tail(next),
            Outcome::Success(StepValue::Push(child, handler)) => ErasedStep::Push(child, handler),
            Outcome::Failure { tag, debug } => ErasedStep::Terminal(ErasedOutcome::Failure {
                canceled: tag.is_canceled(),
                display: tag.to_string(),
                debug,
                tag: Box::new(tag),
            }),
        }
    }
}

/// Erase a strongly-typed handler into the boxed form the stack holds.
///
/// The returned closure downcasts the erased outcome back to
/// `Outcome<S, F>` before calling `handler`. A mismatch can only happen
/// if the scheduler delivers a child's outcome to a handler that was not
/// installed for that child — a scheduler bug, not a domain failure —
/// so it panics with a message naming what went wrong rather than
/// returning a `Failure`.
pub fn erase_handler<S, F, H>(handler: H) -> ErasedHandler
where
    S: Send + 'static,
    F: FailureTag,
    H: FnOnce(Outcome<S, F>) -> BoxedDynOp + Send + 'static,
{
    Box::new(move |erased: ErasedOutcome| -> BoxedDynOp {
        let outcome = match erased {
            ErasedOutcome::Success(v) => match v.downcast::<S>() {
                Ok(v) => Outcome::Success(*v),
                Err(_) => panic!(
                    "internal scheduler error: handler received a success value \
                     of an unexpected type; the child pushed for this handler \
                     must match the handler's declared Success type"
                ),
            },
            ErasedOutcome::Failure { debug, tag, .. } => match tag.downcast::<F>() {
                Ok(tag) => Outcome::Failure { tag: *tag, debug },
                Err(_) => panic!(
                    "internal scheduler error: handler received a failure tag \
                     of an unexpected type; the child pushed for this handler \
                     must match the handler's declared Failure type"
                ),
            },
        };
        handler(outcome)
    })
}
