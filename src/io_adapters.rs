use crate::context::LineReader;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Result as IoResult, Write};
use std::rc::Rc;

/// Line reader over any buffered byte stream.
///
/// Strips one trailing `\n` or `\r\n` from each line. A final line without
/// a terminator is still returned. Bytes that are not UTF-8 are replaced
/// rather than ending the stream.
pub struct BufLines<R> {
    inner: R,
}

impl<R: BufRead> BufLines<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineReader for BufLines<R> {
    fn read_line(&mut self) -> IoResult<Option<String>> {
        let mut buf = Vec::new();
        if self.inner.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Memory-backed reader yielding a fixed script of lines.
pub struct MemReader {
    lines: VecDeque<String>,
}

impl MemReader {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a block of text on newlines, like a piped script.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for MemReader {
    fn read_line(&mut self) -> IoResult<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Memory-backed writer for capturing output.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }

    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Writer that flushes after every write, so prompts without a newline show up.
pub struct FlushingWriter<W> {
    inner: W,
}

impl<W: Write> FlushingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for FlushingWriter<W> {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        let n = self.inner.write(data)?;
        self.inner.flush()?;
        Ok(n)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

/// Sink whose peer has gone away: every write fails with `BrokenPipe`.
#[derive(Debug, Default)]
pub struct ClosedWriter;

impl Write for ClosedWriter {
    fn write(&mut self, _data: &[u8]) -> IoResult<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
