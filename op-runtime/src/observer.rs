//! Step observers: the scheduler's side-band logging hook, generalized
//! beyond the single built-in tracing observer so more than one can be
//! registered, the way a list of hooks fires in sequence elsewhere in
//! this lineage.

use op_core::DurationMs;

/// What happened during one step of the scheduler, handed to every
/// registered [`StepObserver`] after the step's stack mutation is
/// already applied. Observing must never alter stack state — this is
/// a read-only snapshot.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Name of the Op that ran this step.
    pub op_name: String,
    /// Stack depth immediately before this step ran.
    pub stack_depth_before: usize,
    /// Names of every stack entry after this step's mutation, top last.
    /// Ops are named by `Op::name`; handlers as `Handler<parentName>`.
    pub stack_snapshot: Vec<String>,
    /// `Some("success")` or `Some("failure:<display>")` for a terminal
    /// step; `None` for a tail call or a delegate-with-continuation,
    /// neither of which produced a final outcome this step.
    pub outcome_tag: Option<String>,
    /// Wall-clock time this step's `run` took.
    pub duration: DurationMs,
}

/// Observes each scheduler step. Registered observers are called once
/// per step, in registration order, after the stack mutation for that
/// step has already happened — logging is side-band and cannot affect
/// control flow.
pub trait StepObserver: Send + Sync {
    /// Called once per completed step.
    fn on_step(&self, report: &StepReport);
}

/// The default observer: emits one `tracing` event per step.
///
/// `DEBUG` for ordinary steps; `WARN` if the step terminated in a
/// failure, so a log filtered at `info` still surfaces problems without
/// drowning in successful-step chatter.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TracingObserver {
    /// Construct a new tracing-backed observer.
    pub fn new() -> Self {
        Self
    }
}

impl StepObserver for TracingObserver {
    fn on_step(&self, report: &StepReport) {
        let is_failure = matches!(&report.outcome_tag, Some(tag) if tag.starts_with("failure:"));
        if is_failure {
            tracing::warn!(
                op = %report.op_name,
                depth = report.stack_depth_before,
                stack = ?report.stack_snapshot,
                outcome = ?report.outcome_tag,
                duration_ms = report.duration.as_millis(),
                "op.step"
            );
        } else {
            tracing::debug!(
                op = %report.op_name,
                depth = report.stack_depth_before,
                stack = ?report.stack_snapshot,
                outcome = ?report.outcome_tag,
                duration_ms = report.duration.as_millis(),
                "op.step"
            );
        }
    }
}
