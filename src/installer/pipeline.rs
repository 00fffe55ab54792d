//! The install pipeline.
//!
//! Steps run strictly in order, each able to end the run:
//!
//! 1. Resolve prerequisites (entry script, interpreter). Failure ends the
//!    run before anything is written.
//! 2. Write the config template if missing.
//! 3. Upsert the task definition. Failure is reported but does not stop the
//!    run; the definition is submitted whatever the config gate decides.
//! 4. Copy the template to the live config if missing. A fresh copy holds
//!    placeholders, so the run stops without starting the watcher.
//! 5. Start the task.

use std::path::PathBuf;

use super::outcome::InstallationOutcome;
use crate::config::{ensure_live_config, ensure_template, SetupSettings};
use crate::context::{Identity, InstallContext};
use crate::error::{Result, SetupError};
use crate::requirements::{parse_system_path, PrerequisiteChecker};
use crate::scheduler::{upsert, TaskDefinition, TaskScheduler, UpsertReport, TASK_NAME};
use crate::ui::{hints, Summary, UserInterface};

/// Runs the install pipeline against a scheduler.
pub struct Installer<'a> {
    base_dir: PathBuf,
    settings: SetupSettings,
    checker: PrerequisiteChecker,
    identity: Identity,
    scheduler: &'a mut dyn TaskScheduler,
}

impl<'a> Installer<'a> {
    /// Create an installer for `base_dir`, searching the system PATH for the
    /// interpreter and registering the task for the current user.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        settings: SetupSettings,
        scheduler: &'a mut dyn TaskScheduler,
    ) -> Self {
        let checker = PrerequisiteChecker::new(
            &settings.entry_script,
            &settings.interpreter,
            parse_system_path(),
        );

        Self {
            base_dir: base_dir.into(),
            settings,
            checker,
            identity: Identity::current(),
            scheduler,
        }
    }

    /// Use a custom prerequisite checker.
    pub fn with_checker(mut self, checker: PrerequisiteChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Register the task for `identity` instead of the current user.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Execute the pipeline and report the outcome.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> InstallationOutcome {
        let outcome = self.execute(ui);
        self.report(&outcome, ui);
        outcome
    }

    /// Execute the pipeline without the final report.
    pub fn execute(&mut self, ui: &mut dyn UserInterface) -> InstallationOutcome {
        match self.try_execute(ui) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::debug!("Install blocked: {:?}", error);
                InstallationOutcome::Blocked { error }
            }
        }
    }

    fn try_execute(&mut self, ui: &mut dyn UserInterface) -> Result<InstallationOutcome> {
        ui.message("Checking prerequisites...");
        let base_dir = std::path::absolute(&self.base_dir)?;
        let prerequisites = self.checker.check(&base_dir)?;
        let ctx = InstallContext::new(
            base_dir,
            prerequisites,
            &self.settings,
            self.identity.clone(),
        );
        if ui.output_mode().shows_detail() {
            ui.message(&format!("  entry script: {}", ctx.paths.entry_script.display()));
            ui.message(&format!("  interpreter:  {}", ctx.paths.interpreter.display()));
        }

        let template = ensure_template(&ctx.base_dir, &self.settings.template_file)?;

        let def = TaskDefinition::for_watcher(&ctx, &self.settings);
        ui.message(&format!("Registering task '{}'...", def.name));
        let registration = match upsert(&mut *self.scheduler, &def) {
            Ok(report) => {
                if let UpsertReport::Recreated { fallback_reason } = report {
                    ui.warning(&format!(
                        "In-place update was refused ({}); the task was deleted and recreated",
                        fallback_reason
                    ));
                }
                ui.success(&format!("Task '{}' registered", def.name));
                Ok(())
            }
            Err(e) => {
                ui.warning(&e.to_string());
                Err(e)
            }
        };

        let live = ensure_live_config(&ctx.base_dir, &self.settings.live_config_file, &template)?;
        let log = ctx.paths.log_file.clone();

        if live.created {
            tracing::info!("Live config created; not starting the watcher");
            return Ok(InstallationOutcome::AwaitingConfig {
                config: live.path,
                log,
            });
        }

        if let Err(reason) = registration {
            return Ok(InstallationOutcome::PartiallyInstalled {
                reason,
                config: live.path,
                log,
            });
        }

        ui.message("Starting the watcher...");
        match self.scheduler.start(&def.name) {
            Ok(()) => Ok(InstallationOutcome::Running {
                config: live.path,
                log,
            }),
            Err(e) => Ok(InstallationOutcome::PartiallyInstalled {
                reason: SetupError::StartFailed {
                    task: def.name.clone(),
                    reason: e.to_string(),
                },
                config: live.path,
                log,
            }),
        }
    }

    /// Report `outcome`: a status line, the summary box, then a hint.
    pub fn report(&self, outcome: &InstallationOutcome, ui: &mut dyn UserInterface) {
        let hint = match outcome {
            InstallationOutcome::Blocked { error } => {
                ui.error(&error.to_string());
                match error {
                    SetupError::MissingInterpreter { name } => {
                        Some(hints::missing_interpreter(name))
                    }
                    SetupError::MissingEntryScript { .. } => {
                        Some(hints::missing_entry_script().to_string())
                    }
                    _ => None,
                }
            }
            InstallationOutcome::AwaitingConfig { config, .. } => {
                ui.warning(&format!(
                    "Created {} from the template; the watcher was not started",
                    config.display()
                ));
                Some(hints::after_config_created(config))
            }
            InstallationOutcome::Running { .. } => {
                ui.success("Watcher started");
                None
            }
            InstallationOutcome::PartiallyInstalled { reason, .. } => match reason {
                SetupError::StartFailed { task, .. } => {
                    ui.warning(&reason.to_string());
                    Some(hints::after_start_failed(task, self.settings.trigger))
                }
                _ => Some(hints::after_registration_failed().to_string()),
            },
        };

        if !matches!(outcome, InstallationOutcome::Blocked { .. }) {
            ui.show_summary(&self.summary(outcome));
        }
        if let Some(hint) = hint {
            ui.show_hint(&hint);
        }
    }

    fn summary(&self, outcome: &InstallationOutcome) -> Summary {
        let mut summary = Summary::new(outcome.label());
        if let Some(config) = outcome.config_path() {
            summary = summary.row("Config", config.display().to_string());
        }
        if let Some(log) = outcome.log_path() {
            summary = summary.row("Log", log.display().to_string());
        }
        summary
            .row("Task", TASK_NAME)
            .row("Remove with", self.scheduler.removal_command(TASK_NAME))
            .row("Or", "pigeoneer-setup uninstall")
    }
}
