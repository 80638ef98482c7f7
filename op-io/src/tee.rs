//! Tee output: mirrors writes to the real terminal and to a timestamped
//! log file, optionally stripping terminal escape sequences from the
//! file copy only.

use std::io::{self, Write as _};

use chrono::Utc;
use op_core::OutputSink;

/// Scans a byte slice for ANSI CSI/OSC escape sequences and strips them,
/// leaving the visible characters untouched.
///
/// This only recognizes the `ESC [ ... final-byte` (CSI, used for color
/// and cursor control) and `ESC ] ... BEL|ESC \` (OSC, used for titles
/// and hyperlinks) forms — the ones a terminal UI library in this
/// ecosystem actually emits. Anything else containing a bare `ESC` byte
/// is passed through unchanged rather than risk eating real data.
pub fn strip_ansi_escapes(input: &[u8]) -> Vec<u8> {
    const ESC: u8 = 0x1b;
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] != ESC {
            out.push(input[i]);
            i += 1;
            continue;
        }
        match input.get(i + 1) {
            Some(b'[') => {
                // CSI: ESC [ params... final-byte (0x40..=0x7e)
                let mut j = i + 2;
                while j < input.len() && !(0x40..=0x7e).contains(&input[j]) {
                    j += 1;
                }
                i = (j + 1).min(input.len());
            }
            Some(b']') => {
                // OSC: ESC ] ... BEL (0x07) or ST (ESC \)
                let mut j = i + 2;
                loop {
                    if j >= input.len() {
                        break;
                    }
                    if input[j] == 0x07 {
                        j += 1;
                        break;
                    }
                    if input[j] == ESC && input.get(j + 1) == Some(&b'\\') {
                        j += 2;
                        break;
                    }
                    j += 1;
                }
                i = j.min(input.len());
            }
            _ => {
                out.push(input[i]);
                i += 1;
            }
        }
    }
    out
}

/// A write sink that mirrors every chunk to the real output stream and to
/// a log file, prefixing each line written to the file with an ISO-8601
/// timestamp. Releases the file when dropped.
pub struct TeeOutput<W: io::Write + Send> {
    real: W,
    log: std::fs::File,
    strip_ansi: bool,
    /// Whether the last byte written to the log was a newline — so a
    /// chunk that arrives mid-line isn't re-prefixed.
    at_line_start: bool,
}

impl<W: io::Write + Send> TeeOutput<W> {
    /// Wrap `real`, mirroring to `log`. `strip_ansi` controls the file
    /// copy only — the terminal always receives the original bytes.
    pub fn new(real: W, log: std::fs::File, strip_ansi: bool) -> Self {
        Self {
            real,
            log,
            strip_ansi,
            at_line_start: true,
        }
    }

    fn write_to_log(&mut self, data: &[u8]) -> io::Result<()> {
        let data = if self.strip_ansi {
            strip_ansi_escapes(data)
        } else {
            data.to_vec()
        };

        for line in data.split_inclusive(|&b| b == b'\n') {
            let content = line.strip_suffix(b"\n").unwrap_or(line);
            if self.at_line_start && !content.is_empty() {
                let prefix = format!("{} ", Utc::now().to_rfc3339());
                self.log.write_all(prefix.as_bytes())?;
            }
            self.log.write_all(line)?;
            self.at_line_start = line.ends_with(b"\n");
        }
        Ok(())
    }
}

impl<W: io::Write + Send> OutputSink for TeeOutput<W> {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.real.write_all(data)?;
        self.write_to_log(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.real.flush()?;
        self.log.flush()
    }
}
