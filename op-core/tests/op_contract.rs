use async_trait::async_trait;
use op_core::{
    cancel, fail, handle_outcome, succeed, tail_call, BoxedDynOp, CoreFailure, DynOp, ErasedOutcome,
    ErasedStep, IoContext, Op, Outcome, StepValue,
};

fn _assert_send_sync<T: Send + Sync>() {}

#[test]
fn op_is_object_safe_via_dyn_op() {
    _assert_send_sync::<Box<dyn DynOp>>();
}

struct A;
struct B;
struct C;

#[async_trait]
impl Op for A {
    type Success = ();
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<()>, CoreFailure> {
        tail_call(B)
    }

    fn name(&self) -> &str {
        "A"
    }
}

#[async_trait]
impl Op for B {
    type Success = ();
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<()>, CoreFailure> {
        tail_call(C)
    }

    fn name(&self) -> &str {
        "B"
    }
}

#[async_trait]
impl Op for C {
    type Success = &'static str;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<&'static str>, CoreFailure> {
        succeed("done")
    }

    fn name(&self) -> &str {
        "C"
    }
}

/// Walks a tail-call chain by hand, one `run_erased` at a time, the way
/// the scheduler will: this crate has no scheduler of its own, but the
/// erasure boundary it defines must support exactly this sequence.
#[tokio::test]
async fn tail_call_chain_replaces_slot_each_step() {
    let mut io = op_core::test_utils::scripted_io(Vec::new());
    let mut current: BoxedDynOp = Box::new(A);
    let mut names = vec![current.name().to_string()];

    loop {
        match current.run_erased(&mut io).await {
            ErasedStep::Tail(next) => {
                names.push(next.name().to_string());
                current = next;
            }
            ErasedStep::Terminal(ErasedOutcome::Success(value)) => {
                assert_eq!(*value.downcast::<&'static str>().unwrap(), "done");
                break;
            }
            ErasedStep::Terminal(ErasedOutcome::Failure { .. }) => panic!("C must not fail"),
            ErasedStep::Push(..) => panic!("A/B/C never delegate"),
        }
    }

    assert_eq!(names, vec!["A", "B", "C"]);
}

struct Parent;
struct Child;

#[async_trait]
impl Op for Parent {
    type Success = String;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<String>, CoreFailure> {
        handle_outcome(Child, |outcome: Outcome<u32, CoreFailure>| {
            let rendered = match outcome {
                Outcome::Success(v) => format!("child said {v}"),
                Outcome::Failure { .. } => "child failed".to_string(),
            };
            Box::new(Terminal(rendered)) as BoxedDynOp
        })
    }

    fn name(&self) -> &str {
        "parent"
    }
}

#[async_trait]
impl Op for Child {
    type Success = u32;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<u32>, CoreFailure> {
        succeed(42)
    }

    fn name(&self) -> &str {
        "child"
    }
}

struct Terminal(String);

#[async_trait]
impl Op for Terminal {
    type Success = String;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<String>, CoreFailure> {
        succeed(self.0.clone())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

#[tokio::test]
async fn handler_receives_childs_outcome_exactly_once() {
    let mut io = op_core::test_utils::scripted_io(Vec::new());

    let parent: BoxedDynOp = Box::new(Parent);
    let (child, handler) = match parent.run_erased(&mut io).await {
        ErasedStep::Push(child, handler) => (child, handler),
        _ => panic!("parent must delegate"),
    };
    assert_eq!(child.name(), "child");

    let child_step = child.run_erased(&mut io).await;
    let erased_outcome = match child_step {
        ErasedStep::Terminal(outcome) => outcome,
        _ => panic!("child must terminate"),
    };

    let next = handler(erased_outcome);
    assert_eq!(next.name(), "terminal");

    match next.run_erased(&mut io).await {
        ErasedStep::Terminal(ErasedOutcome::Success(v)) => {
            assert_eq!(*v.downcast::<String>().unwrap(), "child said 42");
        }
        _ => panic!("expected a terminal success"),
    }
}

#[test]
fn cancel_sets_the_distinguished_canceled_tag() {
    let outcome: Outcome<StepValue<()>, CoreFailure> = cancel();
    assert!(outcome.is_canceled());
}

#[test]
fn fail_carries_the_given_tag_and_debug() {
    let outcome: Outcome<StepValue<()>, CoreFailure> =
        fail(CoreFailure::unknown_error("boom"), Some("boom".into()));
    assert!(!outcome.is_canceled());
    assert!(!outcome.is_success());
}
