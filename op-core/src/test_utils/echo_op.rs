use async_trait::async_trait;

use crate::io::IoContext;
use crate::op::{succeed, Op, StepValue};
use crate::outcome::{CoreFailure, Outcome};

/// An Op that immediately succeeds with whatever value it was built with —
/// the smallest possible Op, useful as a stand-in leaf when a scheduler
/// test only cares about stack shape, not domain behavior.
pub struct EchoOp<T> {
    value: T,
    name: &'static str,
}

impl<T> EchoOp<T> {
    /// Build an `EchoOp` that succeeds with `value`, named `name`.
    pub fn new(name: &'static str, value: T) -> Self {
        Self { value, name }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Op for EchoOp<T> {
    type Success = T;
    type Failure = CoreFailure;

    async fn run(&self, _io: &mut IoContext) -> Outcome<StepValue<T>, CoreFailure> {
        succeed(self.value.clone())
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_op_succeeds_with_its_value() {
        let op = EchoOp::new("echo", 7);
        let mut io = crate::test_utils::scripted_io(Vec::new());
        match Op::run(&op, &mut io).await {
            Outcome::Success(StepValue::Value(v)) => assert_eq!(v, 7),
            _ => panic!("expected a terminal success"),
        }
    }
}
