use crate::command::{Command, Outcome};
use crate::context::Context;
use crate::error::{CommandError, Failure};
use crate::registry::Registry;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tracing::{debug, warn};

/// What an external utility left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code; `128 + signal` when killed by a signal.
    pub code: i32,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs an operating-system utility and captures its output.
///
/// Injected into the delegating commands so tests can swap in a fake.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`; `Err` only when it could not be started.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Captured>;
}

/// Runs real programs found through `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Captured> {
        debug!(program, "running external utility");
        let output = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    io::Error::new(io::ErrorKind::NotFound, "executable file not found in $PATH")
                }
                _ => e,
            })?;
        Ok(Captured {
            code: exit_code(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Numeric status of a finished process, `128 + signal` for a killed one.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(-1)
}

/// Where a delegating command reports a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureReport {
    /// The error message, on stdout.
    ErrorToStdout,
    /// The error message, on stderr.
    ErrorToStderr,
    /// Whatever the utility printed on stdout, copied to stderr.
    OutputToStderr,
}

/// Command that hands off to an external utility of the same name.
///
/// The utility's stdout is copied verbatim. The reported status is always 0;
/// a failed run is reported on a sink and returned as the error instead.
pub struct Delegate {
    program: &'static str,
    report: FailureReport,
    runner: Arc<dyn ProcessRunner>,
}

impl Delegate {
    pub fn whoami(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            program: "whoami",
            report: FailureReport::ErrorToStdout,
            runner,
        }
    }

    pub fn ls(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            program: "ls",
            report: FailureReport::ErrorToStderr,
            runner,
        }
    }

    pub fn ps(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            program: "ps",
            report: FailureReport::OutputToStderr,
            runner,
        }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }
}

impl Command for Delegate {
    fn execute(&self, _registry: &Registry, ctx: Context<'_>) -> Outcome {
        let (output, failure) = match self.runner.run(self.program, &[]) {
            Ok(captured) if captured.success() => (captured.stdout, None),
            Ok(captured) => {
                let error = CommandError::Exited {
                    program: self.program.to_string(),
                    code: captured.code,
                };
                (captured.stdout, Some(error))
            }
            Err(source) => {
                let error = CommandError::Spawn {
                    program: self.program.to_string(),
                    source,
                };
                (Vec::new(), Some(error))
            }
        };

        // sink writes are best effort; only the run itself decides the outcome
        let Some(error) = failure else {
            let _ = ctx.stdout.write_all(&output);
            return Ok(0);
        };

        warn!(program = self.program, %error, "external utility failed");
        let _ = match self.report {
            FailureReport::ErrorToStdout => writeln!(ctx.stdout, "{}", error),
            FailureReport::ErrorToStderr => writeln!(ctx.stderr, "{}", error),
            FailureReport::OutputToStderr => {
                writeln!(ctx.stderr, "{}", String::from_utf8_lossy(&output))
            }
        };
        let _ = ctx.stdout.write_all(&output);
        Err(Failure::new(0, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::{ClosedWriter, MemReader};
    use crate::test_support::FakeRunner;

    struct Run {
        status: u32,
        error: Option<CommandError>,
        out: String,
        err: String,
    }

    fn run(delegate: &Delegate) -> Run {
        let registry = Registry::empty();
        let mut input = MemReader::from_lines(["untouched"]);
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let ctx = Context::new(&mut input, &mut out, &mut err, "root").args([delegate.program()]);
        let (status, error) = match delegate.execute(&registry, ctx) {
            Ok(status) => (status, None),
            Err(failure) => (failure.status, Some(failure.error)),
        };
        assert_eq!(input.remaining(), 1);
        Run {
            status,
            error,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    #[test]
    fn test_success_copies_stdout_verbatim() {
        let runner = Arc::new(FakeRunner::default().with_output("ls", "a\nb\n"));
        let result = run(&Delegate::ls(runner.clone()));
        assert_eq!(result.status, 0);
        assert!(result.error.is_none());
        assert_eq!(result.out, "a\nb\n");
        assert_eq!(result.err, "");
        assert_eq!(runner.calls(), vec!["ls".to_string()]);
    }

    #[test]
    fn test_whoami_reports_failure_on_stdout() {
        let runner = Arc::new(FakeRunner::default().with_exit("whoami", "", 1));
        let result = run(&Delegate::whoami(runner));
        assert_eq!(result.status, 0);
        assert!(matches!(result.error, Some(CommandError::Exited { code: 1, .. })));
        assert_eq!(result.out, "exit status 1\n");
        assert_eq!(result.err, "");
    }

    #[test]
    fn test_ls_reports_failure_on_stderr() {
        let runner = Arc::new(FakeRunner::default().with_exit("ls", "partial\n", 2));
        let result = run(&Delegate::ls(runner));
        assert_eq!(result.status, 0);
        assert!(result.error.is_some());
        assert_eq!(result.err, "exit status 2\n");
        assert_eq!(result.out, "partial\n");
    }

    #[test]
    fn test_ps_copies_its_output_to_stderr_on_failure() {
        let runner = Arc::new(FakeRunner::default().with_exit("ps", "PID\n", 1));
        let result = run(&Delegate::ps(runner));
        assert_eq!(result.status, 0);
        assert!(result.error.is_some());
        assert_eq!(result.err, "PID\n\n");
        assert_eq!(result.out, "PID\n");
    }

    #[test]
    fn test_missing_utility_is_a_spawn_error() {
        let result = run(&Delegate::ls(Arc::new(FakeRunner::default())));
        assert_eq!(result.status, 0);
        assert!(matches!(result.error, Some(CommandError::Spawn { .. })));
        assert!(result.err.starts_with("ls: "));
        assert_eq!(result.out, "");
    }

    #[test]
    fn test_closed_stdout_does_not_fail_a_successful_run() {
        let runner = Arc::new(FakeRunner::default().with_output("whoami", "root\n"));
        let delegate = Delegate::whoami(runner);
        let registry = Registry::empty();
        let mut input = MemReader::from_lines(Vec::<String>::new());
        let mut out = ClosedWriter;
        let mut err = Vec::<u8>::new();
        let ctx = Context::new(&mut input, &mut out, &mut err, "root").args(["whoami"]);

        assert_eq!(delegate.execute(&registry, ctx).unwrap(), 0);
        assert!(err.is_empty());
    }

    #[test]
    fn test_closed_stderr_keeps_the_run_error() {
        let runner = Arc::new(FakeRunner::default().with_exit("ls", "", 2));
        let delegate = Delegate::ls(runner);
        let registry = Registry::empty();
        let mut input = MemReader::from_lines(Vec::<String>::new());
        let mut out = Vec::<u8>::new();
        let mut err = ClosedWriter;
        let ctx = Context::new(&mut input, &mut out, &mut err, "root").args(["ls"]);

        let failure = delegate.execute(&registry, ctx).unwrap_err();
        assert_eq!(failure.status, 0);
        assert!(matches!(failure.error, CommandError::Exited { code: 2, .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_captures_output() {
        let captured = SystemRunner.run("sh", &["-c", "echo out; echo err >&2; exit 3"]).unwrap();
        assert_eq!(captured.stdout, b"out\n");
        assert_eq!(captured.stderr, b"err\n");
        assert_eq!(captured.code, 3);
        assert!(!captured.success());
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_missing_program() {
        let err = SystemRunner.run("definitely_not_a_real_command_12345", &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), "executable file not found in $PATH");
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_maps_signals() {
        let captured = SystemRunner.run("sh", &["-c", "kill -9 $$"]).unwrap();
        assert_eq!(captured.code, 128 + 9);
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_searches_path_for_bare_names() {
        let captured = SystemRunner.run("sh", &["-c", "exit 0"]).unwrap();
        assert!(captured.success());
        assert!(captured.stdout.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_code_from_wait_status() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(15)), 128 + 15);
    }
}
