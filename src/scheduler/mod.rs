//! Host task scheduler integration.
//!
//! This module provides:
//! - [`TaskDefinition`] describing the supervised watcher task
//! - [`TaskScheduler`] trait over the host's persistent scheduler
//! - [`upsert`] for idempotent create-or-replace registration
//! - Backends: [`Schtasks`] (Windows Task Scheduler), [`SystemdUser`]
//!   (systemd user units) and [`MockScheduler`] for tests

pub mod definition;
pub mod mock;
pub mod schtasks;
pub mod systemd;
pub mod upsert;

pub use definition::{
    LogonType, PowerPolicy, Principal, RestartPolicy, TaskAction, TaskDefinition, TaskTrigger,
    TriggerKind, TASK_NAME,
};
pub use mock::{MockScheduler, SchedulerCall};
pub use schtasks::Schtasks;
pub use systemd::SystemdUser;
pub use upsert::{upsert, UpsertReport};

use thiserror::Error;

/// How [`TaskScheduler::register`] treats an existing task of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterMode {
    /// Replace an existing task in place, or create it.
    Overwrite,
    /// Create only; fail if the task exists.
    CreateOnly,
}

/// Errors reported by a scheduler backend.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No task is registered under this name.
    #[error("task '{name}' not found")]
    NotFound { name: String },

    /// The scheduler refused the operation.
    #[error("{operation} rejected: {message}")]
    Rejected { operation: String, message: String },

    /// This host has no supported scheduler.
    #[error("no supported task scheduler on this platform")]
    Unsupported,

    /// Filesystem error while preparing the request.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The scheduler command could not be run.
    #[error(transparent)]
    Setup(#[from] crate::error::SetupError),
}

impl SchedulerError {
    /// Shorthand for a [`SchedulerError::Rejected`].
    pub fn rejected(operation: &str, message: impl Into<String>) -> Self {
        SchedulerError::Rejected {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// A host facility that persists, triggers and restarts named tasks.
pub trait TaskScheduler {
    /// Register `def` under `def.name`.
    fn register(&mut self, def: &TaskDefinition, mode: RegisterMode) -> Result<(), SchedulerError>;

    /// Remove the task named `name`.
    ///
    /// Returns [`SchedulerError::NotFound`] when no such task exists.
    fn delete(&mut self, name: &str) -> Result<(), SchedulerError>;

    /// Ask the scheduler to run the task now.
    fn start(&mut self, name: &str) -> Result<(), SchedulerError>;

    /// Whether a task named `name` is registered.
    fn is_registered(&mut self, name: &str) -> Result<bool, SchedulerError>;

    /// Native command a user can run to remove the task by hand.
    fn removal_command(&self, name: &str) -> String;
}

/// Placeholder backend for hosts without a supported scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedScheduler;

impl TaskScheduler for UnsupportedScheduler {
    fn register(&mut self, _def: &TaskDefinition, _mode: RegisterMode) -> Result<(), SchedulerError> {
        Err(SchedulerError::Unsupported)
    }

    fn delete(&mut self, _name: &str) -> Result<(), SchedulerError> {
        Err(SchedulerError::Unsupported)
    }

    fn start(&mut self, _name: &str) -> Result<(), SchedulerError> {
        Err(SchedulerError::Unsupported)
    }

    fn is_registered(&mut self, _name: &str) -> Result<bool, SchedulerError> {
        Err(SchedulerError::Unsupported)
    }

    fn removal_command(&self, name: &str) -> String {
        format!("# remove the '{}' task from your scheduler manually", name)
    }
}

/// The scheduler backend for the current host.
pub fn host_scheduler() -> Box<dyn TaskScheduler> {
    if cfg!(windows) {
        Box::new(Schtasks::new())
    } else if cfg!(target_os = "linux") {
        match SystemdUser::for_current_user() {
            Some(systemd) => Box::new(systemd),
            None => Box::new(UnsupportedScheduler),
        }
    } else {
        Box::new(UnsupportedScheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_operation_and_message() {
        let err = SchedulerError::rejected("create", "Access is denied.");
        assert_eq!(err.to_string(), "create rejected: Access is denied.");
    }

    #[test]
    fn not_found_displays_name() {
        let err = SchedulerError::NotFound {
            name: TASK_NAME.to_string(),
        };
        assert!(err.to_string().contains(TASK_NAME));
    }

    #[test]
    fn unsupported_scheduler_refuses_everything() {
        let mut scheduler = UnsupportedScheduler;
        assert!(matches!(
            scheduler.start(TASK_NAME),
            Err(SchedulerError::Unsupported)
        ));
        assert!(matches!(
            scheduler.delete(TASK_NAME),
            Err(SchedulerError::Unsupported)
        ));
        assert!(scheduler.removal_command(TASK_NAME).contains(TASK_NAME));
    }
}
