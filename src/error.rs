use crate::command::ExitStatus;
use std::fmt;
use std::io;
use thiserror::Error;

/// Everything that can go wrong while a command runs.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An output sink refused a write, or the input source failed to read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The input source has no more lines.
    #[error("end of input")]
    EndOfInput,

    /// An external utility could not be started at all.
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// An external utility ran but reported failure.
    #[error("exit status {code}")]
    Exited { program: String, code: i32 },
}

impl CommandError {
    /// True when the error only says that the input ran dry.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CommandError::EndOfInput)
    }
}

/// An error together with the status the failing command reported.
///
/// Commands may fail and still carry a meaningful status: a shell that loses
/// its input returns its last recorded status, a delegated utility returns 0
/// even though it failed. `Failure` keeps both so neither is lost on the way up.
#[derive(Debug)]
pub struct Failure {
    pub status: ExitStatus,
    pub error: CommandError,
}

impl Failure {
    pub fn new(status: ExitStatus, error: impl Into<CommandError>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn end_of_input(status: ExitStatus) -> Self {
        Self::new(status, CommandError::EndOfInput)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.error, self.status)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Attach a status to a fallible result so `?` carries both.
pub trait AtStatus<T> {
    fn at_status(self, status: ExitStatus) -> Result<T, Failure>;
}

impl<T, E: Into<CommandError>> AtStatus<T> for Result<T, E> {
    fn at_status(self, status: ExitStatus) -> Result<T, Failure> {
        self.map_err(|e| Failure::new(status, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_status_keeps_status_with_error() {
        let res: io::Result<()> = Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let failure = res.at_status(127).unwrap_err();
        assert_eq!(failure.status, 127);
        assert!(matches!(failure.error, CommandError::Io(_)));
    }

    #[test]
    fn test_exited_displays_like_a_wait_status() {
        let err = CommandError::Exited {
            program: "ls".to_string(),
            code: 2,
        };
        assert_eq!(err.to_string(), "exit status 2");
    }

    #[test]
    fn test_end_of_input_is_recognised() {
        assert!(Failure::end_of_input(3).error.is_end_of_input());
        assert!(!CommandError::from(io::Error::other("x")).is_end_of_input());
    }
}
