//! In-memory scheduler for testing.
//!
//! `MockScheduler` implements [`TaskScheduler`] over a task table held in
//! memory, records every call, and can be told to fail specific operations.
//!
//! # Example
//!
//! ```
//! use pigeoneer_setup::scheduler::{MockScheduler, TaskScheduler, TASK_NAME};
//!
//! let mut scheduler = MockScheduler::new();
//! scheduler.fail_start("The task is disabled");
//!
//! assert!(scheduler.start(TASK_NAME).is_err());
//! assert_eq!(scheduler.calls().len(), 1);
//! ```

use std::collections::BTreeMap;

use super::{RegisterMode, SchedulerError, TaskDefinition, TaskScheduler};

/// A call made against a [`MockScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCall {
    /// `register` with the given mode.
    Register { name: String, mode: RegisterMode },
    /// `delete`.
    Delete { name: String },
    /// `start`.
    Start { name: String },
    /// `is_registered`.
    Query { name: String },
}

/// In-memory scheduler with injectable failures.
#[derive(Debug, Default)]
pub struct MockScheduler {
    tasks: BTreeMap<String, TaskDefinition>,
    calls: Vec<SchedulerCall>,
    started: Vec<String>,
    overwrite_error: Option<String>,
    create_error: Option<String>,
    delete_error: Option<String>,
    start_error: Option<String>,
    reject_principal_change: bool,
}

impl MockScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler that already holds `def`.
    pub fn with_task(def: TaskDefinition) -> Self {
        let mut scheduler = Self::new();
        scheduler.tasks.insert(def.name.clone(), def);
        scheduler
    }

    /// Make every `Overwrite` registration fail with `message`.
    pub fn fail_overwrite(&mut self, message: &str) {
        self.overwrite_error = Some(message.to_string());
    }

    /// Make every `CreateOnly` registration fail with `message`.
    pub fn fail_create(&mut self, message: &str) {
        self.create_error = Some(message.to_string());
    }

    /// Make every delete of an existing task fail with `message`.
    pub fn fail_delete(&mut self, message: &str) {
        self.delete_error = Some(message.to_string());
    }

    /// Make every start fail with `message`.
    pub fn fail_start(&mut self, message: &str) {
        self.start_error = Some(message.to_string());
    }

    /// Refuse in-place updates that change the task's principal, as Task
    /// Scheduler does when the logon type differs.
    pub fn reject_principal_change(&mut self) {
        self.reject_principal_change = true;
    }

    /// Registered tasks by name.
    pub fn tasks(&self) -> &BTreeMap<String, TaskDefinition> {
        &self.tasks
    }

    /// The task registered under `name`.
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name)
    }

    /// Every call made, in order.
    pub fn calls(&self) -> &[SchedulerCall] {
        &self.calls
    }

    /// Names of tasks successfully started, in order.
    pub fn started(&self) -> &[String] {
        &self.started
    }

    /// Number of `delete` calls.
    pub fn delete_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SchedulerCall::Delete { .. }))
            .count()
    }

    /// Number of `CreateOnly` registrations.
    pub fn create_only_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    SchedulerCall::Register {
                        mode: RegisterMode::CreateOnly,
                        ..
                    }
                )
            })
            .count()
    }
}

impl TaskScheduler for MockScheduler {
    fn register(&mut self, def: &TaskDefinition, mode: RegisterMode) -> Result<(), SchedulerError> {
        self.calls.push(SchedulerCall::Register {
            name: def.name.clone(),
            mode,
        });

        match mode {
            RegisterMode::Overwrite => {
                if let Some(message) = &self.overwrite_error {
                    return Err(SchedulerError::rejected("update", message.clone()));
                }
                if self.reject_principal_change {
                    if let Some(existing) = self.tasks.get(&def.name) {
                        if existing.principal != def.principal {
                            return Err(SchedulerError::rejected(
                                "update",
                                "the existing task runs under a different security context",
                            ));
                        }
                    }
                }
            }
            RegisterMode::CreateOnly => {
                if let Some(message) = &self.create_error {
                    return Err(SchedulerError::rejected("create", message.clone()));
                }
                if self.tasks.contains_key(&def.name) {
                    return Err(SchedulerError::rejected(
                        "create",
                        format!("task '{}' already exists", def.name),
                    ));
                }
            }
        }

        self.tasks.insert(def.name.clone(), def.clone());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), SchedulerError> {
        self.calls.push(SchedulerCall::Delete {
            name: name.to_string(),
        });

        if !self.tasks.contains_key(name) {
            return Err(SchedulerError::NotFound {
                name: name.to_string(),
            });
        }
        if let Some(message) = &self.delete_error {
            return Err(SchedulerError::rejected("delete", message.clone()));
        }
        self.tasks.remove(name);
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<(), SchedulerError> {
        self.calls.push(SchedulerCall::Start {
            name: name.to_string(),
        });

        if let Some(message) = &self.start_error {
            return Err(SchedulerError::rejected("start", message.clone()));
        }
        if !self.tasks.contains_key(name) {
            return Err(SchedulerError::NotFound {
                name: name.to_string(),
            });
        }
        self.started.push(name.to_string());
        Ok(())
    }

    fn is_registered(&mut self, name: &str) -> Result<bool, SchedulerError> {
        self.calls.push(SchedulerCall::Query {
            name: name.to_string(),
        });
        Ok(self.tasks.contains_key(name))
    }

    fn removal_command(&self, name: &str) -> String {
        format!("mock-scheduler delete {}", name)
    }
}
