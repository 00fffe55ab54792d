//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, InstallArgs};
use crate::error::Result;
use crate::scheduler::{host_scheduler, TaskScheduler};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&mut self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    base_dir: PathBuf,
    scheduler: Box<dyn TaskScheduler>,
}

impl CommandDispatcher {
    /// Create a dispatcher for `base_dir` using the host's scheduler.
    pub fn new(base_dir: PathBuf) -> Self {
        Self::with_scheduler(base_dir, host_scheduler())
    }

    /// Create a dispatcher with an explicit scheduler backend.
    pub fn with_scheduler(base_dir: PathBuf, scheduler: Box<dyn TaskScheduler>) -> Self {
        Self {
            base_dir,
            scheduler,
        }
    }

    /// Get the watcher directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&mut self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let scheduler = self.scheduler.as_mut();
        match &cli.command {
            Some(Commands::Install(args)) => {
                super::install::InstallCommand::new(&self.base_dir, args.clone(), scheduler)
                    .execute(ui)
            }
            Some(Commands::Uninstall) => {
                super::uninstall::UninstallCommand::new(scheduler).execute(ui)
            }
            Some(Commands::Status) => {
                super::status::StatusCommand::new(&self.base_dir, scheduler).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                // Default to install with default args
                super::install::InstallCommand::new(
                    &self.base_dir,
                    InstallArgs::default(),
                    scheduler,
                )
                .execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{MockScheduler, TASK_NAME};
    use crate::ui::MockUI;
    use clap::Parser;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.base_dir(), Path::new("/test"));
    }

    #[test]
    fn uninstall_routes_to_scheduler() {
        let mut dispatcher = CommandDispatcher::with_scheduler(
            PathBuf::from("/test"),
            Box::new(MockScheduler::new()),
        );
        let cli = Cli::parse_from(["pigeoneer-setup", "uninstall"]);
        let mut ui = MockUI::new();

        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message(TASK_NAME));
    }
}
