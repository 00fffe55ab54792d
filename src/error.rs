//! Error types for installer operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Pre-flight variants (`MissingEntryScript`, `MissingInterpreter`) abort
//!   the pipeline before anything is written
//! - `RegistrationFailed` and `StartFailed` are degraded states that the
//!   installer reports without aborting
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The watcher's entry script is not in the base directory.
    #[error("Watcher entry script not found: {path}")]
    MissingEntryScript { path: PathBuf },

    /// The interpreter that launches the watcher is not on PATH.
    #[error("Interpreter '{name}' not found on PATH")]
    MissingInterpreter { name: String },

    /// Failed to parse the installer settings file.
    #[error("Failed to parse settings at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The scheduler refused both the in-place update and the recreate.
    #[error("Could not register task '{task}': {reason}")]
    RegistrationFailed { task: String, reason: String },

    /// The task is registered but the scheduler would not run it.
    #[error("Could not start task '{task}': {reason}")]
    StartFailed { task: String, reason: String },

    /// A host command could not be spawned.
    #[error("Could not run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_script_displays_path() {
        let err = SetupError::MissingEntryScript {
            path: PathBuf::from("/opt/pigeoneer/run.py"),
        };
        assert!(err.to_string().contains("/opt/pigeoneer/run.py"));
    }

    #[test]
    fn missing_interpreter_displays_name() {
        let err = SetupError::MissingInterpreter {
            name: "pythonw.exe".into(),
        };
        assert!(err.to_string().contains("pythonw.exe"));
    }

    #[test]
    fn registration_failed_displays_task_and_reason() {
        let err = SetupError::RegistrationFailed {
            task: "PigeoneerTradeWatcher".into(),
            reason: "Access is denied.".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PigeoneerTradeWatcher"));
        assert!(msg.contains("Access is denied."));
    }

    #[test]
    fn start_failed_displays_task_and_reason() {
        let err = SetupError::StartFailed {
            task: "PigeoneerTradeWatcher".into(),
            reason: "task is disabled".into(),
        };
        assert!(err.to_string().contains("task is disabled"));
    }

    #[test]
    fn spawn_failed_keeps_the_cause() {
        let err = SetupError::SpawnFailed {
            command: "schtasks /Query".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("schtasks /Query"));
        assert!(msg.contains("program not found"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
    }
}
