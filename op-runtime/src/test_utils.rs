//! In-process test doubles for scheduler tests, mirroring `op-core`'s own
//! `test_utils`. Gated behind the `test-utils` feature for downstream
//! consumers; available unconditionally to this crate's own tests.

use std::sync::{Arc, Mutex};

use crate::observer::{StepObserver, StepReport};

/// A [`StepObserver`] that records every [`StepReport`] it sees, in
/// order, for assertions against the scheduler's testable properties
/// (stack shape per step, handler invocation order, outcome tags).
#[derive(Clone, Default)]
pub struct RecordingObserver(Arc<Mutex<Vec<StepReport>>>);

impl RecordingObserver {
    /// Build an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every report observed so far, in the order steps ran.
    pub fn reports(&self) -> Vec<StepReport> {
        self.0.lock().unwrap().clone()
    }

    /// The `op_name` field of every observed report, in order — the
    /// shape most scheduler tests actually assert on.
    pub fn op_names(&self) -> Vec<String> {
        self.reports().into_iter().map(|r| r.op_name).collect()
    }
}

impl StepObserver for RecordingObserver {
    fn on_step(&self, report: &StepReport) {
        self.0.lock().unwrap().push(report.clone());
    }
}
