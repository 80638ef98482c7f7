//! Assembles an [`IoContext`] from an [`IoConfig`], per the mode table in
//! the I/O context design: interactive, record, and replay each wire up a
//! different combination of input source and output sink.

use op_core::{IoConfig, IoContext, Mode};

use crate::error::AssembleError;
use crate::live::{LiveInput, LiveOutput};
use crate::recordable::RecordableInput;
use crate::replayable::ReplayableInput;
use crate::session::Session;
use crate::tee::TeeOutput;

fn open_output(log_file: Option<&std::path::Path>) -> Result<Box<dyn op_core::OutputSink>, AssembleError> {
    match log_file {
        None => Ok(Box::new(LiveOutput::new())),
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| AssembleError::LogFileOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(Box::new(TeeOutput::new(std::io::stdout(), file, true)))
        }
    }
}

/// Build an [`IoContext`] for [`Mode::Interactive`], [`Mode::Record`], or
/// [`Mode::Replay`] from a config, per §4.6 of the I/O context design.
/// [`Mode::Test`] is not handled here — see [`AssembleError::UnsupportedTestMode`].
pub async fn assemble(config: &IoConfig) -> Result<IoContext, AssembleError> {
    let output = open_output(config.log_file.as_deref())?;

    match config.mode {
        Mode::Interactive => Ok(IoContext::new(
            Box::new(LiveInput::new()),
            output,
            Mode::Interactive,
            tracing::Span::current(),
        )),
        Mode::Record => {
            let path = config
                .session_file
                .clone()
                .ok_or(AssembleError::MissingSessionFileForRecord)?;
            let (recordable, handle) = RecordableInput::new(Box::new(LiveInput::new()));
            let handle = handle.with_save_path(path);
            Ok(IoContext::new(
                Box::new(recordable),
                output,
                Mode::Record,
                tracing::Span::current(),
            )
            .with_recorder(Box::new(handle)))
        }
        Mode::Replay => {
            let path = config
                .session_file
                .clone()
                .ok_or(AssembleError::MissingSessionFileForReplay)?;
            let session = Session::load(&path)
                .await
                .map_err(|source| AssembleError::SessionLoad { path, source })?;
            let (replayable, handle) = ReplayableInput::new(session, Box::new(LiveInput::new()));
            Ok(IoContext::new(
                Box::new(replayable),
                output,
                Mode::Replay,
                tracing::Span::current(),
            )
            .with_replay_control(Box::new(handle)))
        }
        Mode::Test => Err(AssembleError::UnsupportedTestMode),
    }
}
