use crate::command::{Command, Outcome};
use crate::context::{Context, DEFAULT_IDENTITY};
use crate::error::AtStatus;
use crate::registry::Registry;
use tracing::info;

/// Separator `echo` puts between its arguments.
pub const ECHO_SEPARATOR: &str = "a";

/// Does nothing, successfully.
#[derive(Debug, Clone, Copy)]
pub struct True;

impl Command for True {
    fn execute(&self, _registry: &Registry, _ctx: Context<'_>) -> Outcome {
        Ok(0)
    }
}

/// Does nothing, unsuccessfully.
#[derive(Debug, Clone, Copy)]
pub struct False;

impl Command for False {
    fn execute(&self, _registry: &Registry, _ctx: Context<'_>) -> Outcome {
        Ok(1)
    }
}

/// Writes its arguments joined by [`ECHO_SEPARATOR`], then a newline.
///
/// No option parsing: `-n` is just another word.
#[derive(Debug, Clone, Copy)]
pub struct Echo;

impl Command for Echo {
    fn execute(&self, _registry: &Registry, ctx: Context<'_>) -> Outcome {
        let line = ctx.operands().join(ECHO_SEPARATOR);
        writeln!(ctx.stdout, "{}", line).at_status(0)?;
        Ok(0)
    }
}

/// Copies input lines to stdout until the input ends.
///
/// There is no filesystem: every named file is reported missing and nothing
/// is read.
#[derive(Debug, Clone, Copy)]
pub struct Cat;

impl Command for Cat {
    fn execute(&self, _registry: &Registry, mut ctx: Context<'_>) -> Outcome {
        if let Some((name, files)) = ctx.args.split_first() {
            if !files.is_empty() {
                for file in files {
                    writeln!(ctx.stderr, "{}: {}: No such file or directory", name, file)
                        .at_status(0)?;
                }
                return Ok(1);
            }
        }
        loop {
            let line = ctx.next_line().at_status(0)?;
            writeln!(ctx.stdout, "{}", line).at_status(0)?;
        }
    }
}

/// Starts a nested shell acting as another user (root by default).
///
/// The calling shell keeps its own identity; the new one lasts until the
/// nested shell exits, and its exit status becomes this command's status.
#[derive(Debug, Clone, Copy)]
pub struct Su;

impl Command for Su {
    fn execute(&self, registry: &Registry, mut ctx: Context<'_>) -> Outcome {
        let identity = ctx
            .operands()
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_IDENTITY.to_string());
        info!(from = %ctx.identity, to = %identity, depth = ctx.depth, "switching identity");
        registry.execute(ctx.switch_identity(identity))
    }
}
