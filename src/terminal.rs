//! Line-editing frontend for sessions attached to a terminal.
//!
//! The shell writes its prompt to stdout and then reads a line. `rustyline`
//! wants the prompt handed to it instead, so [`TerminalOutput`] holds back any
//! trailing partial line and [`TerminalInput`] passes it to the editor.

use crate::context::LineReader;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{self, Result as IoResult, Write};
use std::rc::Rc;

type Pending = Rc<RefCell<Vec<u8>>>;

/// Input side: reads lines through `rustyline` with history.
pub struct TerminalInput {
    editor: DefaultEditor,
    pending: Pending,
}

/// Output side: forwards complete lines, keeps the last partial one as prompt.
pub struct TerminalOutput<W: Write> {
    inner: W,
    pending: Pending,
}

/// Connected input/output pair over the process terminal.
pub fn terminal() -> anyhow::Result<(TerminalInput, TerminalOutput<io::Stdout>)> {
    let editor = DefaultEditor::new()?;
    Ok(pair(editor, io::stdout()))
}

fn pair<W: Write>(editor: DefaultEditor, inner: W) -> (TerminalInput, TerminalOutput<W>) {
    let pending = Pending::default();
    let input = TerminalInput {
        editor,
        pending: pending.clone(),
    };
    (input, TerminalOutput { inner, pending })
}

impl LineReader for TerminalInput {
    fn read_line(&mut self) -> IoResult<Option<String>> {
        let prompt = String::from_utf8_lossy(&self.pending.take()).into_owned();
        match self.editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(|e| io::Error::other(e.to_string()))?;
                }
                Ok(Some(line))
            }
            // ^C abandons the line being edited
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl<W: Write> TerminalOutput<W> {
    /// Text waiting to be shown as the next prompt.
    pub fn pending(&self) -> String {
        String::from_utf8_lossy(&self.pending.borrow()).into_owned()
    }
}

impl<W: Write> Write for TerminalOutput<W> {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        let mut pending = self.pending.borrow_mut();
        match data.iter().rposition(|&b| b == b'\n') {
            Some(end) => {
                self.inner.write_all(&pending)?;
                pending.clear();
                self.inner.write_all(&data[..=end])?;
                self.inner.flush()?;
                pending.extend_from_slice(&data[end + 1..]);
            }
            None => pending.extend_from_slice(data),
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for TerminalOutput<W> {
    fn drop(&mut self) {
        let pending = self.pending.take();
        if !pending.is_empty() {
            let _ = self.inner.write_all(&pending);
        }
        let _ = self.inner.flush();
    }
}
