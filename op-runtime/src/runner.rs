//! The OpRunner: a single-stack cooperative scheduler that drives Ops to
//! completion, one step at a time.

use std::sync::Arc;
use std::time::Instant;

use op_core::{BoxedDynOp, DurationMs, ErasedOutcome, ErasedStep, IoContext, Mode};

use crate::error::SchedulerError;
use crate::observer::{StepObserver, StepReport, TracingObserver};
use crate::stack::StackEntry;

/// How long after starting a `replay`-mode run the scheduler waits before
/// instructing the replayable input to begin emission — long enough for
/// an interactive TUI layered on top to attach its listeners.
pub const REPLAY_STARTUP_DELAY_MS: u64 = 250;

/// Whether a step left more work on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// `true` if the stack is non-empty after this step.
    pub has_more_work: bool,
}

/// Drives a single stack of [`op_core::Op`]/Handler entries to
/// completion. Construct with a root Op and an [`IoContext`]; call
/// [`OpRunner::run`] to drive to completion, or [`OpRunner::run_step`]
/// repeatedly for external (e.g. test) control of each transition.
pub struct OpRunner {
    stack: Vec<StackEntry>,
    io: IoContext,
    observers: Vec<Arc<dyn StepObserver>>,
    replay_started: bool,
}

impl OpRunner {
    /// Start a fresh run with `root` as the only stack entry, and the
    /// default [`TracingObserver`] already registered.
    pub fn new(root: BoxedDynOp, io: IoContext) -> Self {
        Self {
            stack: vec![StackEntry::Op(root)],
            io,
            observers: vec![Arc::new(TracingObserver::new())],
            replay_started: false,
        }
    }

    /// Register an additional observer, called after every step.
    pub fn with_observer(mut self, observer: Arc<dyn StepObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replace the default observer list entirely (e.g. to drop the
    /// built-in [`TracingObserver`] in a test that wants only its own).
    pub fn with_observers(mut self, observers: Vec<Arc<dyn StepObserver>>) -> Self {
        self.observers = observers;
        self
    }

    /// `true` once the stack has drained.
    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Current stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// A snapshot of the stack's entry names, bottom first, matching
    /// [`StepReport::stack_snapshot`]'s ordering.
    pub fn stack_snapshot(&self) -> Vec<String> {
        self.stack.iter().map(StackEntry::snapshot_name).collect()
    }

    /// Drive the run to completion: repeated [`OpRunner::run_step`] calls
    /// until the stack is empty, handling the replay-start and
    /// save-on-empty lifecycle hooks along the way.
    pub async fn run(&mut self) -> Result<(), SchedulerError> {
        self.maybe_start_replay().await;
        while !self.is_done() {
            self.run_step().await?;
        }
        Ok(())
    }

    async fn maybe_start_replay(&mut self) {
        if self.replay_started || self.io.mode() != Mode::Replay {
            return;
        }
        if let Some(replay) = self.io.replay_control() {
            replay.start_replay(REPLAY_STARTUP_DELAY_MS).await;
        }
        self.replay_started = true;
    }

    /// Perform exactly one state transition: run the Op at the top of the
    /// stack, then apply whatever mutation its outcome calls for. See the
    /// module-level design notes for the full case analysis.
    pub async fn run_step(&mut self) -> Result<StepOutcome, SchedulerError> {
        self.maybe_start_replay().await;

        let depth_before = self.stack.len();
        let top = self.stack.pop().ok_or(SchedulerError::EmptyStack)?;
        let op = match top {
            StackEntry::Op(op) => op,
            StackEntry::Handler { parent_name, .. } => {
                return Err(SchedulerError::HandlerAtTopOfStack { parent_name });
            }
        };

        let op_name = op.name().to_string();
        let started = Instant::now();
        let step = op.run_erased(&mut self.io).await;
        let duration = DurationMs::from(started.elapsed());

        let outcome_tag = match &step {
            ErasedStep::Tail(_) | ErasedStep::Push(..) => None,
            ErasedStep::Terminal(ErasedOutcome::Success(_)) => Some("success".to_string()),
            ErasedStep::Terminal(ErasedOutcome::Failure { display, .. }) => {
                Some(format!("failure:{display}"))
            }
        };

        match step {
            ErasedStep::Tail(next) => {
                self.stack.push(StackEntry::Op(next));
            }
            ErasedStep::Push(child, handler) => {
                self.stack.push(StackEntry::Handler {
                    handler,
                    parent_name: op_name.clone(),
                });
                self.stack.push(StackEntry::Op(child));
            }
            ErasedStep::Terminal(outcome) => {
                self.deliver_to_waiting_handler(outcome).await?;
            }
        }

        let report = StepReport {
            op_name,
            stack_depth_before: depth_before,
            stack_snapshot: self.stack_snapshot(),
            outcome_tag,
            duration,
        };
        for observer in &self.observers {
            observer.on_step(&report);
        }

        if self.is_done() {
            self.maybe_save_on_empty().await?;
        }

        Ok(StepOutcome {
            has_more_work: !self.is_done(),
        })
    }

    async fn deliver_to_waiting_handler(&mut self, outcome: ErasedOutcome) -> Result<(), SchedulerError> {
        let Some(StackEntry::Handler { .. }) = self.stack.last() else {
            // No handler waiting: this was the root, or a tail-called Op
            // whose result nobody asked for. The outcome is dropped.
            return Ok(());
        };
        let Some(StackEntry::Handler { handler, .. }) = self.stack.pop() else {
            unreachable!("just matched Handler on last()");
        };
        let next = handler(outcome);
        self.stack.push(StackEntry::Op(next));
        Ok(())
    }

    async fn maybe_save_on_empty(&mut self) -> Result<(), SchedulerError> {
        if self.io.mode() != Mode::Record {
            return Ok(());
        }
        if let Some(recorder) = self.io.recorder() {
            recorder.save().await.map_err(SchedulerError::SessionSave)?;
        }
        Ok(())
    }
}
