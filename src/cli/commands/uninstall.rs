//! The `uninstall` command.
//!
//! Removes the scheduled task. The template, live config and watcher log
//! are left where they are.

use crate::error::Result;
use crate::scheduler::{SchedulerError, TaskScheduler, TASK_NAME};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The uninstall command implementation.
pub struct UninstallCommand<'a> {
    scheduler: &'a mut dyn TaskScheduler,
}

impl<'a> UninstallCommand<'a> {
    /// Create a new uninstall command.
    pub fn new(scheduler: &'a mut dyn TaskScheduler) -> Self {
        Self { scheduler }
    }
}

impl Command for UninstallCommand<'_> {
    fn execute(&mut self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.scheduler.delete(TASK_NAME) {
            Ok(()) => {
                ui.success(&format!("Removed task '{}'", TASK_NAME));
                ui.message("Config files and logs were left in place.");
                Ok(CommandResult::success())
            }
            Err(SchedulerError::NotFound { .. }) => {
                ui.message(&format!(
                    "Task '{}' is not installed; nothing to remove",
                    TASK_NAME
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&format!("Could not remove task '{}': {}", TASK_NAME, e));
                ui.show_hint(&format!(
                    "Try removing it by hand: {}",
                    self.scheduler.removal_command(TASK_NAME)
                ));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
