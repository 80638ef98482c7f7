use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::io::{InputSource, IoContext, Mode, OutputSink};

struct ScriptedInput {
    chunks: VecDeque<Vec<u8>>,
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.chunks.pop_front())
    }

    fn set_raw_mode(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

/// A handle onto the bytes a [`ScriptedOutputSink`] has captured, cloneable
/// so test code can hold one end while the `IoContext` holds the other.
#[derive(Clone, Default)]
pub struct ScriptedOutput(Arc<Mutex<Vec<u8>>>);

impl ScriptedOutput {
    /// Everything written so far, as a UTF-8 string (lossily, for asserts).
    pub fn written(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

struct ScriptedOutputSink(ScriptedOutput);

impl OutputSink for ScriptedOutputSink {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.0 .0.lock().unwrap().extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Build an [`IoContext`] in [`Mode::Test`] backed by a fixed sequence of
/// input chunks and a discarded output sink. For scheduler and Op unit
/// tests that don't care what gets written.
pub fn scripted_io(chunks: Vec<Vec<u8>>) -> IoContext {
    let (io, _output) = scripted_io_capturing(chunks);
    io
}

/// Like [`scripted_io`], but also returns a handle to inspect everything
/// written to the context's output sink.
pub fn scripted_io_capturing(chunks: Vec<Vec<u8>>) -> (IoContext, ScriptedOutput) {
    let output = ScriptedOutput::default();
    let input = ScriptedInput {
        chunks: chunks.into(),
    };
    let sink = ScriptedOutputSink(output.clone());
    let io = IoContext::new(
        Box::new(input),
        Box::new(sink),
        Mode::Test,
        tracing::Span::none(),
    );
    (io, output)
}
