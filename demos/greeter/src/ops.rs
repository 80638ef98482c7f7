//! A handful of illustrative Ops wiring together a tiny interactive
//! greeter: ask for a name, read a line, greet, say goodbye.
//!
//! Not part of the core's contract — this crate exists only to exercise
//! `op-core`/`op-io`/`op-runtime` end to end, the way a small example
//! binary exercises a library's protocol traits.

use async_trait::async_trait;
use op_core::{cancel, fail_with_unknown_error, handle_outcome, succeed, BoxedDynOp, FailureTag, IoContext, Op, Outcome, StepValue};

/// The exhaustive set of failure tags any Op in this demo can produce.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GreeterFailure {
    /// The user explicitly aborted (typed `/cancel`).
    #[error("canceled")]
    Canceled,
    /// An uncaught exception escaped `run`.
    #[error("unknown error: {0}")]
    UnknownError(String),
    /// Input ended before a newline was seen.
    #[error("input ended before a line was completed")]
    InputEnded,
}

impl FailureTag for GreeterFailure {
    fn canceled() -> Self {
        Self::Canceled
    }

    fn unknown_error(message: impl Into<String>) -> Self {
        Self::UnknownError(message.into())
    }

    fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

fn write_line(io: &mut IoContext, line: &str) {
    let _ = io.output().write_chunk(line.as_bytes());
    let _ = io.output().flush();
}

/// Reads chunks from the I/O context until a newline is seen, returning
/// the trimmed line. `/cancel` on its own line produces the distinguished
/// canceled failure instead of a success.
pub struct ReadLine;

#[async_trait]
impl Op for ReadLine {
    type Success = String;
    type Failure = GreeterFailure;

    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<String>, GreeterFailure> {
        let mut buf = Vec::new();
        loop {
            match io.input().read_chunk().await {
                Ok(Some(chunk)) => {
                    buf.extend_from_slice(&chunk);
                    if buf.contains(&b'\n') {
                        break;
                    }
                }
                Ok(None) => {
                    if buf.is_empty() {
                        return op_core::fail(GreeterFailure::InputEnded, None);
                    }
                    break;
                }
                Err(e) => return fail_with_unknown_error(e.to_string()),
            }
        }
        let line = String::from_utf8_lossy(&buf).trim().to_string();
        if line == "/cancel" {
            cancel()
        } else {
            succeed(line)
        }
    }

    fn name(&self) -> &str {
        "readLine"
    }
}

/// Prints a prompt, then delegates to [`ReadLine`], routing the result to
/// [`Greet`] on success or [`Farewell`] on cancellation or failure.
pub struct AskName;

#[async_trait]
impl Op for AskName {
    type Success = ();
    type Failure = GreeterFailure;

    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<()>, GreeterFailure> {
        write_line(io, "What is your name? (type /cancel to quit)\n");
        handle_outcome(ReadLine, |outcome: Outcome<String, GreeterFailure>| {
            let next: BoxedDynOp = match outcome {
                Outcome::Success(name) if !name.is_empty() => Box::new(Greet(name)),
                Outcome::Success(_) => Box::new(Farewell::because("you didn't type anything")),
                Outcome::Failure { tag, .. } if tag.is_canceled() => {
                    Box::new(Farewell::because("you canceled"))
                }
                Outcome::Failure { tag, .. } => Box::new(Farewell::because(&tag.to_string())),
            };
            next
        })
    }

    fn name(&self) -> &str {
        "askName"
    }
}

/// Prints a greeting, then tail-calls [`Farewell`].
pub struct Greet(pub String);

#[async_trait]
impl Op for Greet {
    type Success = ();
    type Failure = GreeterFailure;

    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<()>, GreeterFailure> {
        write_line(io, &format!("Hello, {}!\n", self.0));
        op_core::tail_call(Farewell::because("that's all for now"))
    }

    fn name(&self) -> &str {
        "greet"
    }
}

/// The terminal leaf of every path through this demo.
pub struct Farewell {
    reason: String,
}

impl Farewell {
    /// Build a farewell, printing `reason` as the sign-off line.
    pub fn because(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Op for Farewell {
    type Success = ();
    type Failure = GreeterFailure;

    async fn run(&self, io: &mut IoContext) -> Outcome<StepValue<()>, GreeterFailure> {
        write_line(io, &format!("Goodbye ({}).\n", self.reason));
        succeed(())
    }

    fn name(&self) -> &str {
        "farewell"
    }
}
