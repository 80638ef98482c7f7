//! Thin wrappers over the live process stdio streams, used directly in
//! interactive mode and as the innermost layer underneath
//! [`crate::recordable::RecordableInput`] and
//! [`crate::replayable::ReplayableInput`].

use std::io::{self, Write as _};

use async_trait::async_trait;
use op_core::{InputSource, OutputSink};
use tokio::io::{AsyncReadExt, Stdin};

/// Reads chunks directly from the process's real stdin.
pub struct LiveInput {
    stdin: Stdin,
    raw_mode: bool,
}

impl LiveInput {
    /// Wrap the process's stdin.
    pub fn new() -> Self {
        Self {
            stdin: tokio::io::stdin(),
            raw_mode: false,
        }
    }

    /// Whether raw mode is currently considered enabled. There is no real
    /// terminal mode switch here (that belongs to a TUI library layered
    /// on top); this only tracks the flag so `set_raw_mode` round-trips.
    pub fn raw_mode(&self) -> bool {
        self.raw_mode
    }
}

impl Default for LiveInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for LiveInput {
    async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = [0u8; 4096];
        let n = self.stdin.read(&mut buf).await?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(buf[..n].to_vec()))
        }
    }

    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()> {
        self.raw_mode = enabled;
        Ok(())
    }
}

/// Writes chunks directly to the process's real stdout.
pub struct LiveOutput {
    stdout: io::Stdout,
}

impl LiveOutput {
    /// Wrap the process's stdout.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for LiveOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for LiveOutput {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.stdout.write_all(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
