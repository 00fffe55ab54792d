//! The `status` command.
//!
//! Reports task registration, config files and credential state without
//! changing anything.

use std::path::{Path, PathBuf};

use crate::config::{unfilled_credentials, EnvFileParser, SetupSettings};
use crate::error::Result;
use crate::scheduler::{TaskScheduler, TASK_NAME};
use crate::ui::{hints, Summary, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand<'a> {
    base_dir: PathBuf,
    scheduler: &'a mut dyn TaskScheduler,
}

/// Credential state of the live config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// No live config yet.
    NoConfig,
    /// The live config could not be read.
    Unreadable(String),
    /// These keys are empty or still hold placeholders.
    Unfilled(Vec<&'static str>),
    /// Every credential has a value.
    Filled,
}

impl CredentialState {
    /// Inspect the live config at `path`.
    pub fn inspect(path: &Path) -> Self {
        if !path.exists() {
            return Self::NoConfig;
        }
        match EnvFileParser::load(path) {
            Ok(vars) => {
                let unfilled = unfilled_credentials(&vars);
                if unfilled.is_empty() {
                    Self::Filled
                } else {
                    Self::Unfilled(unfilled)
                }
            }
            Err(e) => Self::Unreadable(format!("{:#}", e)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::NoConfig => "no live config".to_string(),
            Self::Unreadable(e) => format!("unreadable ({})", e),
            Self::Unfilled(keys) => format!("placeholder: {}", keys.join(", ")),
            Self::Filled => "set".to_string(),
        }
    }
}

impl<'a> StatusCommand<'a> {
    /// Create a new status command.
    pub fn new(base_dir: &Path, scheduler: &'a mut dyn TaskScheduler) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            scheduler,
        }
    }
}

fn presence(path: &Path) -> String {
    if path.exists() {
        format!("{} (present)", path.display())
    } else {
        format!("{} (missing)", path.display())
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&mut self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = SetupSettings::load(&self.base_dir)?;
        let template = self.base_dir.join(&settings.template_file);
        let config = self.base_dir.join(&settings.live_config_file);
        let credentials = CredentialState::inspect(&config);

        let registered = self.scheduler.is_registered(TASK_NAME);
        let task = match &registered {
            Ok(true) => "registered".to_string(),
            Ok(false) => "not registered".to_string(),
            Err(e) => format!("unknown ({})", e),
        };

        let summary = Summary::new("Status")
            .row("Task", format!("{} {}", TASK_NAME, task))
            .row("Template", presence(&template))
            .row("Config", presence(&config))
            .row("Credentials", credentials.describe())
            .row("Log", settings.log_path().display().to_string());
        ui.show_summary(&summary);

        if matches!(registered, Ok(false)) {
            ui.show_hint(hints::not_installed());
        }
        if let CredentialState::Unfilled(keys) = &credentials {
            ui.show_hint(&hints::fill_credentials(keys, &config));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::template::{CHAT_PLACEHOLDER, TOKEN_PLACEHOLDER};
    use crate::scheduler::MockScheduler;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn credential_state_of_missing_config() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            CredentialState::inspect(&temp.path().join(".env")),
            CredentialState::NoConfig
        );
    }

    #[test]
    fn credential_state_lists_placeholders() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(
            &path,
            format!("TG_TOKEN={}\nTG_CHAT={}\n", TOKEN_PLACEHOLDER, CHAT_PLACEHOLDER),
        )
        .unwrap();

        assert_eq!(
            CredentialState::inspect(&path),
            CredentialState::Unfilled(vec!["TG_TOKEN", "TG_CHAT"])
        );
    }

    #[test]
    fn credential_state_filled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "TG_TOKEN=123:abc\nTG_CHAT=42\n").unwrap();

        assert_eq!(CredentialState::inspect(&path), CredentialState::Filled);
    }

    #[test]
    fn status_reports_unregistered_task_and_missing_files() {
        let temp = TempDir::new().unwrap();
        let mut scheduler = MockScheduler::new();
        let mut ui = MockUI::new();

        let result = StatusCommand::new(temp.path(), &mut scheduler)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let summary = ui.last_summary().unwrap();
        assert!(summary.get("Task").unwrap().ends_with("not registered"));
        assert!(summary.get("Config").unwrap().ends_with("(missing)"));
        assert_eq!(summary.get("Credentials"), Some("no live config"));
        assert!(ui.has_hint("pigeoneer-setup install"));
    }

    #[test]
    fn status_hints_at_unfilled_credentials() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "TG_TOKEN=123:abc\nTG_CHAT=\n").unwrap();
        let mut scheduler = MockScheduler::new();
        let mut ui = MockUI::new();

        StatusCommand::new(temp.path(), &mut scheduler)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(
            ui.last_summary().unwrap().get("Credentials"),
            Some("placeholder: TG_CHAT")
        );
        assert!(ui.has_hint("Set TG_CHAT"));
    }
}
