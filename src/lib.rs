//! Command dispatch and a nested read-eval loop for line-oriented sessions.
//!
//! A session is driven by a [`Context`]: the argument vector, a line source,
//! stdout and stderr sinks, whether to prompt, and the acting user. The
//! [`Registry`] maps command names to [`Command`]s and dispatches a context to
//! the right one. The `sh` command reads lines, splits them on whitespace and
//! dispatches each through the same registry; `su` starts a nested `sh` under
//! another identity, so shells nest by plain recursion.
//!
//! How bytes reach the session (a terminal, a pipe, a socket) is up to the
//! caller, which supplies the [`LineReader`] and the two sinks.
//!
//! ```
//! use session_shell::io_adapters::MemReader;
//! use session_shell::{Context, Registry};
//!
//! let registry = Registry::default();
//! let mut input = MemReader::from_text("echo a b c\nexit 4\n");
//! let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
//! let ctx = Context::new(&mut input, &mut out, &mut err, "root");
//! assert_eq!(registry.execute(ctx).unwrap(), 4);
//! assert_eq!(out, b"aabac\n");
//! ```

pub mod builtin;
pub mod command;
pub mod config;
pub mod context;
mod dispatch;
pub mod error;
pub mod external;
pub mod interpreter;
pub mod io_adapters;
mod registry;
pub mod terminal;

#[cfg(test)]
mod test_support;

pub use command::{Command, ExitStatus, Outcome, STATUS_NOT_FOUND};
pub use config::SessionConfig;
pub use context::{Context, LineReader};
pub use dispatch::execute_program;
pub use error::{AtStatus, CommandError, Failure};
pub use interpreter::tokenize;
pub use registry::Registry;
