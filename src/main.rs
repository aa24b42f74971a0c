use anyhow::Result;
use argh::FromArgs;
use session_shell::context::SHELL_PROGRAM;
use session_shell::io_adapters::{BufLines, FlushingWriter};
use session_shell::{
    Context, ExitStatus, LineReader, Outcome, Registry, SessionConfig, terminal, tokenize,
};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(FromArgs)]
/// Run a line-oriented command session on standard input and output.
struct Args {
    #[argh(option, short = 'u')]
    /// user the session starts as (default: $SESSION_SHELL_USER, then $USER, then root)
    user: Option<String>,

    #[argh(switch, short = 'i')]
    /// show prompts even when standard input is not a terminal
    interactive: bool,

    #[argh(switch)]
    /// never show prompts
    no_prompt: bool,

    #[argh(option)]
    /// deepest allowed shell nesting (default: $SESSION_SHELL_MAX_DEPTH, then 64)
    max_depth: Option<usize>,

    #[argh(option, short = 'c')]
    /// run a single command line instead of a shell
    command: Option<String>,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr and stay off unless RUST_LOG asks for them
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Args = argh::from_env();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.interactive && args.no_prompt {
        anyhow::bail!("--interactive and --no-prompt are mutually exclusive");
    }

    let mut config = SessionConfig::from_env()?;
    if let Some(user) = args.user {
        config.identity = user;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = Some(depth);
    }
    let on_terminal = io::stdin().is_terminal();
    config.interactive = !args.no_prompt && (args.interactive || on_terminal);

    let registry = config.registry();
    let argv = match &args.command {
        Some(line) => tokenize(line),
        None => vec![SHELL_PROGRAM.to_string()],
    };

    let outcome = if on_terminal {
        let (mut input, mut stdout) = terminal::terminal()?;
        run_session(&registry, &config, argv, &mut input, &mut stdout)
    } else {
        let mut input = BufLines::new(io::stdin().lock());
        let mut stdout = FlushingWriter::new(io::stdout().lock());
        run_session(&registry, &config, argv, &mut input, &mut stdout)
    };

    let status = match outcome {
        Ok(status) => status,
        Err(failure) if failure.error.is_end_of_input() => failure.status,
        Err(failure) => {
            eprintln!("{}: {}", env!("CARGO_PKG_NAME"), failure.error);
            failure.status
        }
    };
    Ok(exit_code(status))
}

fn run_session(
    registry: &Registry,
    config: &SessionConfig,
    argv: Vec<String>,
    input: &mut dyn LineReader,
    stdout: &mut dyn io::Write,
) -> Outcome {
    let mut stderr = io::stderr();
    let ctx = Context::new(input, stdout, &mut stderr, config.identity.clone())
        .args(argv)
        .interactive(config.interactive);
    registry.execute(ctx)
}

/// Status as the operating system would see it.
fn exit_code(status: ExitStatus) -> ExitCode {
    ExitCode::from((status % 256) as u8)
}
