//! # op-io — the pluggable I/O context and record/replay subsystem
//!
//! Concrete implementations of the input/output shape [`op_core::io`]
//! defines: a live-terminal source and sink, a recordable proxy that
//! timestamps every chunk it forwards, a replayable source that emits a
//! recorded session on a wall-clock schedule before falling through to
//! live input, and a tee sink that mirrors output to a log file.
//!
//! | Module | What it does |
//! |--------|---------------|
//! | [`session`] | The [`session::Session`]/[`session::InputEvent`] wire format and its atomic save/load. |
//! | [`recordable`] | [`recordable::RecordableInput`] — records every chunk it forwards. |
//! | [`replayable`] | [`replayable::ReplayableInput`] — replays a session, then switches to live. |
//! | [`tee`] | [`tee::TeeOutput`] and the ANSI-escape stripping used in the log copy. |
//! | [`live`] | Thin wrappers over the real process stdin/stdout. |
//! | [`assemble`] | Builds an [`op_core::IoContext`] from an [`op_core::IoConfig`], per mode. |
//! | [`error`] | [`error::AssembleError`] — caller-input failures during assembly. |

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod error;
pub mod live;
pub mod recordable;
pub mod replayable;
pub mod session;
pub mod tee;

pub use assemble::assemble;
pub use error::AssembleError;
pub use live::{LiveInput, LiveOutput};
pub use recordable::{RecordableInput, RecordableSessionHandle};
pub use replayable::{ReplayStartHandle, ReplayableInput};
pub use session::{InputEvent, Session, SESSION_FORMAT_VERSION};
pub use tee::{strip_ansi_escapes, TeeOutput};
