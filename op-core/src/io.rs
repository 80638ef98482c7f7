//! The I/O context: the pluggable standard input/output surface every Op
//! receives, and the configuration shape used to assemble it.
//!
//! This crate defines only the *shape* — traits and the aggregate struct.
//! The concrete live-terminal, recordable, replayable, and tee
//! implementations live in `op-io`; `op-core` has no dependency on them,
//! matching the dependency order `Outcome <- Op <- I/O context`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

/// The four operating modes of the I/O context. Orthogonal to any Op's
/// own behavior — an Op never branches on this itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live terminal, no recording.
    Interactive,
    /// Live terminal; keystrokes are recorded to a session file when the
    /// run completes.
    Record,
    /// A previously recorded session is replayed, then live input resumes.
    Replay,
    /// Whatever a test harness injects.
    Test,
}

/// Configuration an embedder supplies to assemble an [`IoContext`]
/// (assembly itself is `op-io`'s job; this crate only names the fields).
#[derive(Debug, Clone)]
pub struct IoConfig {
    /// Which of the four modes to build.
    pub mode: Mode,
    /// Required when `mode` is [`Mode::Record`] or [`Mode::Replay`].
    pub session_file: Option<PathBuf>,
    /// Optional tee destination for output.
    pub log_file: Option<PathBuf>,
}

impl IoConfig {
    /// A plain interactive configuration: no recording, no logging.
    pub fn interactive() -> Self {
        Self {
            mode: Mode::Interactive,
            session_file: None,
            log_file: None,
        }
    }
}

/// An input source an Op can read from. Implemented by the live terminal
/// wrapper, the recordable proxy, and the replayable source in `op-io`.
#[async_trait]
pub trait InputSource: Send {
    /// Read the next chunk of bytes, or `Ok(None)` at end of stream.
    async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Toggle terminal raw mode, if the underlying source supports it.
    /// A source mid-replay ignores this — the scheduler owns timing
    /// during replay.
    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()>;
}

/// An output sink an Op writes to. Implemented by the live terminal
/// wrapper and the tee in `op-io`.
pub trait OutputSink: Send {
    /// Write a chunk, mirroring it to any configured log destination.
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

/// Lifecycle hook back into a recordable input, invoked by the scheduler
/// when the stack empties in record mode.
#[async_trait]
pub trait SessionRecorder: Send {
    /// Serialize the recorded session to its configured path.
    async fn save(&self) -> io::Result<()>;
}

/// Lifecycle hook into a replayable input, invoked by the scheduler once
/// at startup in replay mode.
#[async_trait]
pub trait ReplayControl: Send {
    /// Begin scheduling recorded events after `startup_delay_ms`.
    async fn start_replay(&self, startup_delay_ms: u64);
}

/// The aggregate every Op's `run` receives: input, output, the active
/// mode, a tracing span for structured per-run logging, and optional
/// back-references so the scheduler can drive record/replay lifecycle
/// events without every Op needing to know about them.
///
/// The mode is immutable for the context's lifetime.
pub struct IoContext {
    input: Box<dyn InputSource>,
    output: Box<dyn OutputSink>,
    mode: Mode,
    span: tracing::Span,
    recorder: Option<Box<dyn SessionRecorder>>,
    replay: Option<Box<dyn ReplayControl>>,
}

impl IoContext {
    /// Build a context directly from its parts. `op-io` is the intended
    /// caller for anything beyond tests; this crate only defines the shape.
    pub fn new(
        input: Box<dyn InputSource>,
        output: Box<dyn OutputSink>,
        mode: Mode,
        span: tracing::Span,
    ) -> Self {
        Self {
            input,
            output,
            mode,
            span,
            recorder: None,
            replay: None,
        }
    }

    /// Attach the session-save lifecycle hook (record mode).
    pub fn with_recorder(mut self, recorder: Box<dyn SessionRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Attach the replay-start lifecycle hook (replay mode).
    pub fn with_replay_control(mut self, replay: Box<dyn ReplayControl>) -> Self {
        self.replay = Some(replay);
        self
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mutable access to the input source, for Ops that read stdin.
    pub fn input(&mut self) -> &mut dyn InputSource {
        self.input.as_mut()
    }

    /// Mutable access to the output sink, for Ops that write stdout.
    pub fn output(&mut self) -> &mut dyn OutputSink {
        self.output.as_mut()
    }

    /// The span this run's Ops and the scheduler log under.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// The recorder hook, present only when this context was assembled in
    /// record mode.
    pub fn recorder(&self) -> Option<&dyn SessionRecorder> {
        self.recorder.as_deref()
    }

    /// The replay-control hook, present only when this context was
    /// assembled in replay mode.
    pub fn replay_control(&self) -> Option<&dyn ReplayControl> {
        self.replay.as_deref()
    }
}
