use crate::context::DEFAULT_IDENTITY;
use crate::external::SystemRunner;
use crate::registry::Registry;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env as stdenv;
use std::sync::Arc;

/// Variable naming the user a session starts as.
pub const USER_VAR: &str = "SESSION_SHELL_USER";

/// Variable bounding how deeply shells may nest.
pub const MAX_DEPTH_VAR: &str = "SESSION_SHELL_MAX_DEPTH";

/// Nesting bound used when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for the root context of a session.
///
/// Fields are public; command-line flags are applied on top of what
/// [`SessionConfig::from_env`] finds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// User the root shell acts as.
    pub identity: String,
    /// Whether prompts are shown.
    pub interactive: bool,
    /// Deepest shell nesting allowed; `None` for no limit.
    pub max_depth: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: DEFAULT_IDENTITY.to_string(),
            interactive: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl SessionConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&stdenv::vars().collect())
    }

    /// Read settings from a set of variables.
    ///
    /// The identity comes from [`USER_VAR`], then `USER`, then `root`.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(user) = [USER_VAR, "USER"]
            .iter()
            .filter_map(|key| vars.get(*key))
            .find(|user| !user.is_empty())
        {
            config.identity = user.clone();
        }
        if let Some(depth) = vars.get(MAX_DEPTH_VAR) {
            let depth = depth
                .trim()
                .parse()
                .with_context(|| format!("{}: not a number: {:?}", MAX_DEPTH_VAR, depth))?;
            config.max_depth = Some(depth);
        }
        Ok(config)
    }

    /// The standard commands, bounded as configured, running real utilities.
    pub fn registry(&self) -> Registry {
        Registry::builtin(Arc::new(SystemRunner), self.max_depth)
    }
}
