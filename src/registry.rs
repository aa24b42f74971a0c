use crate::builtin::{Cat, Echo, False, Su, True};
use crate::command::{Command, Outcome};
use crate::context::{Context, SHELL_PROGRAM};
use crate::dispatch::execute_program;
use crate::external::{Delegate, ProcessRunner, SystemRunner};
use crate::interpreter::Shell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Fixed mapping from command name to the unit that runs it.
///
/// Built once, then only read. Names are matched exactly and case-sensitively.
pub struct Registry {
    commands: HashMap<&'static str, Box<dyn Command>>,
}

impl Registry {
    /// An empty registry; every lookup misses.
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// The standard command set, delegating system utilities to `runner`.
    ///
    /// `max_depth` bounds how deeply shells may nest; `None` leaves it unbounded.
    pub fn builtin(runner: Arc<dyn ProcessRunner>, max_depth: Option<usize>) -> Self {
        Self::empty()
            .with_command(SHELL_PROGRAM, Shell::new(max_depth))
            .with_command("true", True)
            .with_command("false", False)
            .with_command("echo", Echo)
            .with_command("cat", Cat)
            .with_command("su", Su)
            .with_command("whoami", Delegate::whoami(runner.clone()))
            .with_command("ls", Delegate::ls(runner.clone()))
            .with_command("ps", Delegate::ps(runner))
    }

    /// Process-wide registry backed by the real system utilities.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::default)
    }

    /// Register `command` under `name`, replacing any previous entry.
    pub fn with_command(mut self, name: &'static str, command: impl Command + 'static) -> Self {
        self.commands.insert(name, Box::new(command));
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch `ctx` by its command name. See [`execute_program`].
    pub fn execute(&self, ctx: Context<'_>) -> Outcome {
        execute_program(self, ctx)
    }
}

impl Default for Registry {
    /// The standard command set backed by [`SystemRunner`], with unbounded nesting.
    fn default() -> Self {
        Self::builtin(Arc::new(SystemRunner), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = Registry::default();
        assert_eq!(
            registry.names(),
            vec!["cat", "echo", "false", "ls", "ps", "sh", "su", "true", "whoami"]
        );
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let registry = Registry::default();
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("ECHO").is_none());
        assert!(registry.lookup("ech").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_empty_registry_misses_everything() {
        assert!(Registry::empty().lookup("sh").is_none());
        assert!(Registry::empty().names().is_empty());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
    }
}
