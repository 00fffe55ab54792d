//! Terminal result of an install run.

use std::path::{Path, PathBuf};

use crate::error::SetupError;

/// Exit code for a running or partially installed watcher.
pub const EXIT_OK: i32 = 0;
/// Exit code for a pre-flight failure or unexpected error.
pub const EXIT_BLOCKED: i32 = 1;
/// Exit code when the live config was just created and needs editing.
pub const EXIT_AWAITING_CONFIG: i32 = 2;

/// How an install run ended.
#[derive(Debug)]
pub enum InstallationOutcome {
    /// Nothing usable was installed.
    Blocked {
        /// What stopped the run.
        error: SetupError,
    },
    /// The task is registered but the live config holds placeholders.
    AwaitingConfig {
        /// Live config the user must edit.
        config: PathBuf,
        /// Where the watcher will log.
        log: PathBuf,
    },
    /// The task is registered and was started.
    Running {
        /// Live config path.
        config: PathBuf,
        /// Where the watcher logs.
        log: PathBuf,
    },
    /// Installation went through but registration or start failed.
    PartiallyInstalled {
        /// `RegistrationFailed` or `StartFailed`.
        reason: SetupError,
        /// Live config path.
        config: PathBuf,
        /// Where the watcher logs.
        log: PathBuf,
    },
}

impl InstallationOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallationOutcome::Blocked { .. } => EXIT_BLOCKED,
            InstallationOutcome::AwaitingConfig { .. } => EXIT_AWAITING_CONFIG,
            InstallationOutcome::Running { .. } | InstallationOutcome::PartiallyInstalled { .. } => {
                EXIT_OK
            }
        }
    }

    /// Whether the process should report success.
    pub fn is_success(&self) -> bool {
        self.exit_code() == EXIT_OK
    }

    /// Live config path, when the run got far enough to know it.
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            InstallationOutcome::Blocked { .. } => None,
            InstallationOutcome::AwaitingConfig { config, .. }
            | InstallationOutcome::Running { config, .. }
            | InstallationOutcome::PartiallyInstalled { config, .. } => Some(config),
        }
    }

    /// Watcher log path, when known.
    pub fn log_path(&self) -> Option<&Path> {
        match self {
            InstallationOutcome::Blocked { .. } => None,
            InstallationOutcome::AwaitingConfig { log, .. }
            | InstallationOutcome::Running { log, .. }
            | InstallationOutcome::PartiallyInstalled { log, .. } => Some(log),
        }
    }

    /// Short label used in the summary title.
    pub fn label(&self) -> &'static str {
        match self {
            InstallationOutcome::Blocked { .. } => "Blocked",
            InstallationOutcome::AwaitingConfig { .. } => "Awaiting config",
            InstallationOutcome::Running { .. } => "Running",
            InstallationOutcome::PartiallyInstalled { .. } => "Partially installed",
        }
    }
}
