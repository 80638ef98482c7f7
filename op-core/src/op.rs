//! The Op contract — the unit of composition for interactive CLI programs.

use async_trait::async_trait;

use crate::erased::{erase_handler, BoxedDynOp, ErasedHandler};
use crate::io::IoContext;
use crate::outcome::{FailureTag, Outcome};

/// What a successful `run` hands the scheduler: a terminal value, a tail
/// call, or a delegate-with-continuation request.
///
/// This is the Rust shape of the dynamically-typed original's habit of
/// letting a `Success` payload be either "a plain value", "another Op",
/// or "an Op plus a handler" — the three arms the scheduler's step loop
/// switches on.
pub enum StepValue<S> {
    /// `run` is finished; `S` is the Op's terminal success payload. It is
    /// handed to whatever handler is installed below this slot, or
    /// dropped silently if nothing is waiting (this stack slot was the
    /// root).
    Value(S),
    /// Tail call (REPLACE, spec's "plain returned Op"): the returned Op
    /// takes this Op's stack slot. This Op is discarded; it cannot be
    /// resumed.
    Tail(BoxedDynOp),
    /// Delegate-with-continuation (PUSH, spec's `OpWithHandler`): this Op
    /// is replaced by the handler, and the child is pushed above it. When
    /// the child's slot eventually terminates, the handler runs exactly
    /// once with its outcome.
    Push(BoxedDynOp, ErasedHandler),
}

/// An abstract unit of work: a stable name plus an asynchronous `run`
/// that yields an [`Outcome`].
///
/// Implementations are expected to be small, possibly-stateful structs —
/// constructor-captured parameters that stay immutable for the Op's
/// lifetime — not free functions. An Op instance may be placed on the
/// stack more than once (e.g. a parent that re-runs itself via its
/// default handler); each `run` invocation must be independent and
/// tolerate being called repeatedly.
#[async_trait]
pub trait Op: Send + Sync + 'static {
    /// The type of value this Op produces on success.
    type Success: Send + 'static;
    /// The exhaustive union of this Op's failure tags. Must include the
    /// two distinguished tags every Op shares — see [`FailureTag`].
    type Failure: FailureTag;

    /// Run this Op to completion (or to its next tail call / delegation).
    ///
    /// Must not panic for ordinary domain failures — anything this Op
    /// expects to go wrong belongs in `Self::Failure`. A panic is only
    /// appropriate for conditions the scheduler will treat as a fatal
    /// framework error.
    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<Self::Success>, Self::Failure>;

    /// Stable, human-readable name used in logging and stack snapshots.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Op + ?Sized> Op for std::sync::Arc<T> {
    type Success = T::Success;
    type Failure = T::Failure;

    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<Self::Success>, Self::Failure> {
        T::run(self, io).await
    }

    fn name(&self) -> &str {
        T::name(self)
    }
}

/// Produce a terminal success.
pub fn succeed<S, F: FailureTag>(value: S) -> Outcome<StepValue<S>, F> {
    Outcome::Success(StepValue::Value(value))
}

/// Produce a terminal failure with an optional debug string.
pub fn fail<S, F: FailureTag>(tag: F, debug: Option<String>) -> Outcome<StepValue<S>, F> {
    Outcome::Failure { tag, debug }
}

/// Produce the distinguished "user canceled" failure.
pub fn cancel<S, F: FailureTag>() -> Outcome<StepValue<S>, F> {
    Outcome::Failure { tag: F::canceled(), debug: None }
}

/// Produce the distinguished catch-all failure, carrying a message.
pub fn fail_with_unknown_error<S, F: FailureTag>(message: impl Into<String>) -> Outcome<StepValue<S>, F> {
    let message = message.into();
    Outcome::Failure { tag: F::unknown_error(message.clone()), debug: Some(message) }
}

/// Tail-call (REPLACE): hand the scheduler a new Op to take this slot.
pub fn tail_call<S, F, C>(next: C) -> Outcome<StepValue<S>, F>
where
    F: FailureTag,
    C: Op,
{
    Outcome::Success(StepValue::Tail(Box::new(next)))
}

/// Delegate-with-continuation (PUSH): push `child`, installing `handler`
/// in this Op's place. `handler` is total — it must return an Op for
/// every possible outcome `child` can produce — and is invoked at most
/// once, when `child`'s stack slot terminates.
pub fn handle_outcome<S, F, C, H>(child: C, handler: H) -> Outcome<StepValue<S>, F>
where
    F: FailureTag,
    C: Op,
    H: FnOnce(Outcome<C::Success, C::Failure>) -> BoxedDynOp + Send + 'static,
{
    Outcome::Success(StepValue::Push(Box::new(child), erase_handler(handler)))
}

/// Delegate-with-continuation using the default handler: re-run `parent`
/// itself, discarding the child's outcome. `parent` must be an
/// `Arc` so the same instance (and its captured state) can be handed back
/// to the scheduler.
pub fn handle_outcome_default<S, F, C, P>(child: C, parent: std::sync::Arc<P>) -> Outcome<StepValue<S>, F>
where
    F: FailureTag,
    C: Op,
    P: Op + 'static,
{
    handle_outcome(child, move |_outcome| Box::new(parent) as BoxedDynOp)
}
