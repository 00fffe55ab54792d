//! Install context.
//!
//! Everything the pipeline would otherwise read from ambient process state
//! (working directory, user identity) is resolved once into an
//! [`InstallContext`] and passed explicitly to each step.

use std::path::PathBuf;

use crate::config::SetupSettings;
use crate::requirements::Prerequisites;

/// Identity the task is registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account name.
    pub user: String,
    /// Windows domain or machine name, when known.
    pub domain: Option<String>,
}

impl Identity {
    /// Resolve the current user from the process environment.
    pub fn current() -> Self {
        Self::from_env(|key: &str| std::env::var(key))
    }

    /// Resolve the current user with a custom env var lookup function.
    ///
    /// Uses `USERNAME`/`USERDOMAIN` (Windows) and falls back to `USER`.
    pub fn from_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let user = env_fn("USERNAME")
            .or_else(|_| env_fn("USER"))
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let domain = env_fn("USERDOMAIN").ok().filter(|d| !d.is_empty());

        Self { user, domain }
    }
}

/// Paths resolved for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// Watcher entry script.
    pub entry_script: PathBuf,
    /// Interpreter that runs the entry script.
    pub interpreter: PathBuf,
    /// Watcher log file.
    pub log_file: PathBuf,
}

/// Context threaded through the install pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    /// Directory the watcher is installed in and runs from.
    pub base_dir: PathBuf,
    /// User the task belongs to.
    pub identity: Identity,
    /// Resolved paths.
    pub paths: InstallPaths,
}

impl InstallContext {
    /// Build the context after prerequisites have been resolved.
    pub fn new(
        base_dir: PathBuf,
        prerequisites: Prerequisites,
        settings: &SetupSettings,
        identity: Identity,
    ) -> Self {
        let paths = InstallPaths {
            log_file: settings.log_path(),
            entry_script: prerequisites.entry_script,
            interpreter: prerequisites.interpreter,
        };

        Self {
            base_dir,
            identity,
            paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Result<String, VarError> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn windows_identity_includes_domain() {
        let id = Identity::from_env(env_from(&[("USERNAME", "exile"), ("USERDOMAIN", "DESKTOP-1")]));
        assert_eq!(id.user, "exile");
        assert_eq!(id.domain.as_deref(), Some("DESKTOP-1"));
    }

    #[test]
    fn unix_identity_falls_back_to_user() {
        let id = Identity::from_env(env_from(&[("USER", "exile")]));
        assert_eq!(id.user, "exile");
        assert!(id.domain.is_none());
    }

    #[test]
    fn empty_values_are_ignored() {
        let id = Identity::from_env(env_from(&[("USERNAME", ""), ("USER", ""), ("USERDOMAIN", "")]));
        assert_eq!(id.user, "unknown");
        assert!(id.domain.is_none());
    }

    #[test]
    fn context_carries_resolved_paths() {
        let settings = SetupSettings {
            log_file: Some(PathBuf::from("/logs/agent.log")),
            ..SetupSettings::default()
        };
        let ctx = InstallContext::new(
            PathBuf::from("/opt/pigeoneer"),
            Prerequisites {
                entry_script: PathBuf::from("/opt/pigeoneer/run.py"),
                interpreter: PathBuf::from("/usr/bin/python3"),
            },
            &settings,
            Identity {
                user: "exile".to_string(),
                domain: None,
            },
        );

        assert_eq!(ctx.base_dir, PathBuf::from("/opt/pigeoneer"));
        assert_eq!(ctx.paths.log_file, PathBuf::from("/logs/agent.log"));
        assert_eq!(ctx.paths.interpreter, PathBuf::from("/usr/bin/python3"));
    }
}
