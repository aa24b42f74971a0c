use crate::command::{Outcome, STATUS_NOT_FOUND};
use crate::context::Context;
use crate::error::AtStatus;
use crate::registry::Registry;
use tracing::debug;

/// Resolve `ctx.args[0]` in `registry` and run it.
///
/// An empty argument vector is a silent success. An unknown name writes
/// `"<name>: command not found"` to stderr and yields [`STATUS_NOT_FOUND`].
/// Otherwise the command's own outcome is returned untouched.
///
/// Every nested invocation goes through here, so not-found handling and error
/// propagation are the same at every depth.
pub fn execute_program(registry: &Registry, ctx: Context<'_>) -> Outcome {
    let Some(name) = ctx.args.first() else {
        return Ok(0);
    };
    match registry.lookup(name) {
        Some(command) => {
            debug!(command = %name, identity = %ctx.identity, depth = ctx.depth, "dispatch");
            command.execute(registry, ctx)
        }
        None => {
            debug!(command = %name, "command not found");
            writeln!(ctx.stderr, "{}: command not found", name).at_status(STATUS_NOT_FOUND)?;
            Ok(STATUS_NOT_FOUND)
        }
    }
}
