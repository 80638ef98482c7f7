use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use op_core::{
    cancel, handle_outcome, handle_outcome_default, succeed, tail_call, BoxedDynOp, CoreFailure,
    IoContext, Op, Outcome, StepValue,
};
use op_runtime::test_utils::RecordingObserver;
use op_runtime::OpRunner;

fn io() -> IoContext {
    op_core::test_utils::scripted_io(Vec::new())
}

struct A;
struct B;
struct C;

#[async_trait]
impl Op for A {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        tail_call(B)
    }
    fn name(&self) -> &str {
        "A"
    }
}

#[async_trait]
impl Op for B {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        tail_call(C)
    }
    fn name(&self) -> &str {
        "B"
    }
}

#[async_trait]
impl Op for C {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        succeed(99)
    }
    fn name(&self) -> &str {
        "C"
    }
}

/// Scenario 1: tail-call chain A -> B -> C, each run exactly once.
#[tokio::test]
async fn tail_call_chain_runs_each_op_once() {
    let observer = RecordingObserver::default();
    let mut runner = OpRunner::new(Box::new(A), io()).with_observers(vec![Arc::new(observer.clone())]);
    runner.run().await.unwrap();

    let names: Vec<_> = observer.reports().iter().map(|r| r.op_name.clone()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(runner.is_done());
}

struct ChildReturns42;

#[async_trait]
impl Op for ChildReturns42 {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        succeed(42)
    }
    fn name(&self) -> &str {
        "childReturns42"
    }
}

/// Scenario 2: a parent installed via `handle_outcome_default` re-runs
/// itself with the child's outcome discarded, then terminates.
struct ArcDefaultHandlerParent(Arc<Mutex<u32>>);

#[async_trait]
impl Op for ArcDefaultHandlerParent {
    type Success = i32;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        let mut runs = self.0.lock().unwrap();
        *runs += 1;
        if *runs > 1 {
            succeed(42)
        } else {
            let runs_handle = self.0.clone();
            drop(runs);
            handle_outcome_default(ChildReturns42, Arc::new(ArcDefaultHandlerParent(runs_handle)))
        }
    }

    fn name(&self) -> &str {
        "arcDefaultHandlerParent"
    }
}

#[tokio::test]
async fn default_handler_re_runs_parent_and_then_terminates() {
    let observer = RecordingObserver::default();
    let runs = Arc::new(Mutex::new(0u32));
    let root: BoxedDynOp = Box::new(ArcDefaultHandlerParent(runs));
    let mut runner = OpRunner::new(root, io()).with_observers(vec![Arc::new(observer.clone())]);
    runner.run().await.unwrap();

    let names: Vec<_> = observer.reports().iter().map(|r| r.op_name.clone()).collect();
    assert_eq!(
        names,
        vec!["arcDefaultHandlerParent", "childReturns42", "arcDefaultHandlerParent"]
    );
}

struct Leaf(&'static str, i32);

#[async_trait]
impl Op for Leaf {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        succeed(self.1)
    }
    fn name(&self) -> &str {
        self.0
    }
}

struct OuterParent;
struct InnerParent;

#[async_trait]
impl Op for OuterParent {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        handle_outcome(InnerParent, |outcome: Outcome<i32, CoreFailure>| {
            let v = match outcome {
                Outcome::Success(v) => v,
                Outcome::Failure { .. } => -1,
            };
            Box::new(Leaf("outerResult", v + 1)) as BoxedDynOp
        })
    }
    fn name(&self) -> &str {
        "outerParent"
    }
}

#[async_trait]
impl Op for InnerParent {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        handle_outcome(Leaf("innerChild", 10), |outcome: Outcome<i32, CoreFailure>| {
            let v = match outcome {
                Outcome::Success(v) => v,
                Outcome::Failure { .. } => -1,
            };
            Box::new(Leaf("innerResult", v * 2)) as BoxedDynOp
        })
    }
    fn name(&self) -> &str {
        "innerParent"
    }
}

/// Scenario 3: deep unwind with custom handlers — the inner handler must
/// fire strictly before the outer one, and stack depth must peak at 4
/// (outerParent's handler, innerParent's handler, innerChild, plus the
/// handler frame each installs).
#[tokio::test]
async fn deep_unwind_invokes_handlers_inner_before_outer() {
    let observer = RecordingObserver::default();
    let mut runner =
        OpRunner::new(Box::new(OuterParent), io()).with_observers(vec![Arc::new(observer.clone())]);
    runner.run().await.unwrap();

    let reports = observer.reports();
    let names: Vec<_> = reports.iter().map(|r| r.op_name.clone()).collect();
    assert_eq!(
        names,
        vec!["outerParent", "innerParent", "innerChild", "innerResult", "outerResult"]
    );

    let peak_depth = reports.iter().map(|r| r.stack_depth_before).max().unwrap();
    assert!(peak_depth >= 3, "expected the stack to grow with two nested handlers installed");
}

struct CancelingChild;

#[async_trait]
impl Op for CancelingChild {
    type Success = i32;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<i32>, CoreFailure> {
        cancel()
    }
    fn name(&self) -> &str {
        "cancelingChild"
    }
}

struct CancelAwareParent;

#[async_trait]
impl Op for CancelAwareParent {
    type Success = &'static str;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<&'static str>, CoreFailure> {
        handle_outcome(CancelingChild, |outcome: Outcome<i32, CoreFailure>| {
            let label = if outcome.is_canceled() {
                "went back to menu"
            } else {
                "unexpected"
            };
            Box::new(Leaf2(label)) as BoxedDynOp
        })
    }
    fn name(&self) -> &str {
        "cancelAwareParent"
    }
}

struct Leaf2(&'static str);

#[async_trait]
impl Op for Leaf2 {
    type Success = &'static str;
    type Failure = CoreFailure;
    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<&'static str>, CoreFailure> {
        succeed(self.0)
    }
    fn name(&self) -> &str {
        "leaf2"
    }
}

/// Scenario 4: cancellation flows as a value, never as an exception; the
/// parent's handler inspects it and picks a different branch.
#[tokio::test]
async fn cancellation_is_handled_as_a_value() {
    let mut runner = OpRunner::new(Box::new(CancelAwareParent), io());
    runner.run().await.unwrap();
    assert!(runner.is_done());
}

/// Step-wise execution lets test code observe the stack between steps.
#[tokio::test]
async fn run_step_exposes_intermediate_stack_shape() {
    let mut runner = OpRunner::new(Box::new(A), io());

    assert_eq!(runner.stack_snapshot(), vec!["A"]);
    runner.run_step().await.unwrap();
    assert_eq!(runner.stack_snapshot(), vec!["B"]);
    runner.run_step().await.unwrap();
    assert_eq!(runner.stack_snapshot(), vec!["C"]);
    let step = runner.run_step().await.unwrap();
    assert!(!step.has_more_work);
    assert!(runner.stack_snapshot().is_empty());
}
