use crate::context::Context;
use crate::error::Failure;
use crate::registry::Registry;

/// Status code reported by every command.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Unlike a process exit code it is not truncated to a byte.
pub type ExitStatus = u32;

/// Status reported when no command is registered under the requested name.
pub const STATUS_NOT_FOUND: ExitStatus = 127;

/// Result of running a command: a status, or a status paired with an error.
pub type Outcome = Result<ExitStatus, Failure>;

/// Object-safe trait for anything the dispatcher can run by name.
///
/// Commands are stateless: everything a single run needs arrives in the
/// [`Context`], and the [`Registry`] is passed along so a command can
/// dispatch nested commands of its own.
pub trait Command: Send + Sync {
    /// Runs the command, consuming the context built for this call.
    fn execute(&self, registry: &Registry, ctx: Context<'_>) -> Outcome;
}
