//! The `sh` command: a read-eval loop over the session's input.

use crate::command::{Command, ExitStatus, Outcome};
use crate::context::Context;
use crate::error::AtStatus;
use crate::registry::Registry;
use tracing::{info, warn};

/// Reserved word that leaves the current shell.
pub const EXIT: &str = "exit";

/// Status used when `exit` is given something that is not a number.
pub const STATUS_BAD_EXIT_CODE: ExitStatus = 255;

/// Interactive read-eval loop.
///
/// Each non-blank line is split on whitespace and dispatched through the
/// registry with a child context. `exit [code]` ends the loop; without a code
/// the last recorded status is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shell {
    max_depth: Option<usize>,
}

impl Shell {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }
}

impl Command for Shell {
    fn execute(&self, registry: &Registry, mut ctx: Context<'_>) -> Outcome {
        if self.max_depth.is_some_and(|max| ctx.depth >= max) {
            warn!(depth = ctx.depth, identity = %ctx.identity, "refusing to nest another shell");
            let name = ctx.program().unwrap_or("sh").to_string();
            writeln!(ctx.stderr, "{}: maximum nesting depth exceeded", name).at_status(1)?;
            return Ok(1);
        }

        info!(identity = %ctx.identity, depth = ctx.depth, "shell started");
        let prompt = prompt(ctx.interactive, &ctx.identity);
        let mut last_status: ExitStatus = 0;
        loop {
            // even an empty prompt reaches the sink, so a dead stdout ends the loop here
            let shown = ctx.stdout.write(prompt.as_bytes()).at_status(last_status)?;
            if shown < prompt.len() {
                ctx.stdout.write_all(&prompt.as_bytes()[shown..]).at_status(last_status)?;
            }
            let line = ctx.next_line().at_status(last_status)?;

            let args = tokenize(&line);
            let Some(first) = args.first() else {
                continue;
            };
            if first == EXIT {
                let status = exit_status(args.get(1).map(String::as_str), last_status);
                info!(identity = %ctx.identity, depth = ctx.depth, status, "shell exited");
                return Ok(status);
            }

            let mut child = ctx.with_args(args);
            child.depth += 1;
            last_status = registry.execute(child)?;
        }
    }
}

/// Prompt shown before each line: none unless interactive, `# ` for root.
pub fn prompt(interactive: bool, identity: &str) -> &'static str {
    match (interactive, identity) {
        (false, _) => "",
        (true, "root") => "# ",
        (true, _) => "$ ",
    }
}

/// Split a line on runs of whitespace. No quoting of any kind.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Status for `exit`: the given decimal code, 255 if it does not parse,
/// `last` if absent.
pub fn exit_status(code: Option<&str>, last: ExitStatus) -> ExitStatus {
    match code {
        None => last,
        Some(code) if code.bytes().all(|b| b.is_ascii_digit()) => {
            code.parse().unwrap_or(STATUS_BAD_EXIT_CODE)
        }
        Some(_) => STATUS_BAD_EXIT_CODE,
    }
}
