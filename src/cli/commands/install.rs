//! The `install` command.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::config::SetupSettings;
use crate::error::Result;
use crate::installer::Installer;
use crate::scheduler::TaskScheduler;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand<'a> {
    base_dir: PathBuf,
    args: InstallArgs,
    scheduler: &'a mut dyn TaskScheduler,
}

impl<'a> InstallCommand<'a> {
    /// Create a new install command.
    pub fn new(base_dir: &Path, args: InstallArgs, scheduler: &'a mut dyn TaskScheduler) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            args,
            scheduler,
        }
    }

    fn settings(&self) -> Result<SetupSettings> {
        let mut settings = SetupSettings::load(&self.base_dir)?;
        if let Some(trigger) = self.args.trigger {
            settings.trigger = trigger;
        }
        Ok(settings)
    }
}

impl Command for InstallCommand<'_> {
    fn execute(&mut self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.settings()?;
        ui.show_header("Pigeoneer trade watcher setup");

        let outcome = Installer::new(&self.base_dir, settings, &mut *self.scheduler).run(ui);

        if outcome.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(outcome.exit_code()))
        }
    }
}
