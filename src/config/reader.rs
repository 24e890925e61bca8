//! Logical-line reading with an unbounded, growable buffer.

use std::io::{ErrorKind, Read};

const INITIAL_CAPACITY: usize = 256;

/// Reads whole lines from any byte source without a built-in length limit.
///
/// The internal buffer doubles whenever a line outgrows it; bytes already
/// read are never lost or re-read from the source. A final line without a
/// trailing newline is still returned before end-of-file is reported.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    /// Start of the unconsumed region in `buf`.
    start: usize,
    /// End of the valid region in `buf`.
    end: usize,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; INITIAL_CAPACITY],
            start: 0,
            end: 0,
            eof: false,
        }
    }

    /// Returns the next logical line with its trailing newline (and any
    /// `\r` before it) stripped, or `Ok(None)` at genuine end-of-file.
    pub fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            let pending = &self.buf[self.start..self.end];
            if let Some(offset) = pending.iter().position(|&b| b == b'\n') {
                let line = take_line(&self.buf[self.start..self.start + offset]);
                self.start += offset + 1;
                return Ok(Some(line));
            }

            if self.eof {
                if self.start == self.end {
                    return Ok(None);
                }
                // Final line without a trailing newline is still a line.
                let line = take_line(&self.buf[self.start..self.end]);
                self.start = self.end;
                return Ok(Some(line));
            }

            // Reclaim consumed space before growing.
            if self.start > 0 {
                self.buf.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }
            if self.end == self.buf.len() {
                let doubled = self.buf.len() * 2;
                self.buf.resize(doubled, 0);
            }

            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

fn take_line(bytes: &[u8]) -> String {
    let bytes = match bytes.last() {
        Some(b'\r') => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}
