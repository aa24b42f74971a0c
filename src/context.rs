use crate::error::CommandError;
use std::io::{self, Write};

/// Argument vector that starts a shell.
pub const SHELL_PROGRAM: &str = "sh";

/// Identity assumed by `su` when no user is named.
pub const DEFAULT_IDENTITY: &str = "root";

/// Source of input lines for a session.
///
/// `Ok(None)` means the stream is exhausted; there is no pushback.
pub trait LineReader {
    /// Read one logical line, without its line terminator.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Everything a single command invocation gets to see.
///
/// A context is built for one call and dropped when that call returns.
/// Children are derived with [`Context::with_args`] or
/// [`Context::switch_identity`], which reborrow the parent's streams for the
/// lifetime of the child, so the parent can neither observe nor change the
/// child's view while it runs.
pub struct Context<'a> {
    /// Arguments; index 0 is the command name.
    pub args: Vec<String>,
    pub input: &'a mut dyn LineReader,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
    /// Whether a prompt should be shown.
    pub interactive: bool,
    /// The acting user.
    pub identity: String,
    /// Number of shells between this context and the root.
    pub depth: usize,
}

impl<'a> Context<'a> {
    /// Root context running a shell, non-interactive, at depth 0.
    pub fn new(
        input: &'a mut dyn LineReader,
        stdout: &'a mut dyn Write,
        stderr: &'a mut dyn Write,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            args: vec![SHELL_PROGRAM.to_string()],
            input,
            stdout,
            stderr,
            interactive: false,
            identity: identity.into(),
            depth: 0,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Name this context was invoked under, if any.
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Arguments after the command name.
    pub fn operands(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    /// Child context identical to this one except for its arguments.
    pub fn with_args(&mut self, args: Vec<String>) -> Context<'_> {
        Context {
            args,
            input: &mut *self.input,
            stdout: &mut *self.stdout,
            stderr: &mut *self.stderr,
            interactive: self.interactive,
            identity: self.identity.clone(),
            depth: self.depth,
        }
    }

    /// Child context that starts a new shell acting as `identity`.
    pub fn switch_identity(&mut self, identity: String) -> Context<'_> {
        let mut child = self.with_args(vec![SHELL_PROGRAM.to_string()]);
        child.identity = identity;
        child
    }

    /// Read the next line, turning end-of-stream into [`CommandError::EndOfInput`].
    pub fn next_line(&mut self) -> Result<String, CommandError> {
        self.input.read_line()?.ok_or(CommandError::EndOfInput)
    }
}
