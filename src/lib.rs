//! pigeoneer-setup - installs the Pigeoneer trade watcher as a supervised
//! background task.
//!
//! The installer checks that the watcher's entry script and interpreter are
//! present, bootstraps its `.env` config from a documented template,
//! registers it with the host task scheduler (restart on exit, runs on
//! battery) and starts it once the config exists.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Installer settings and watcher config bootstrapping
//! - [`context`] - Per-run install context
//! - [`error`] - Error types and result aliases
//! - [`installer`] - The install pipeline and its outcomes
//! - [`requirements`] - Prerequisite checks and PATH probing
//! - [`scheduler`] - Task definition, upsert and scheduler backends
//! - [`shell`] - Host command execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use pigeoneer_setup::installer::{InstallationOutcome, Installer};
//! use pigeoneer_setup::config::SetupSettings;
//! use pigeoneer_setup::scheduler::MockScheduler;
//! use pigeoneer_setup::ui::MockUI;
//! use tempfile::TempDir;
//!
//! // An empty directory has no entry script, so nothing is installed.
//! let temp = TempDir::new().unwrap();
//! let mut scheduler = MockScheduler::new();
//! let mut ui = MockUI::new();
//!
//! let outcome = Installer::new(temp.path(), SetupSettings::default(), &mut scheduler)
//!     .run(&mut ui);
//!
//! assert!(matches!(outcome, InstallationOutcome::Blocked { .. }));
//! assert_eq!(outcome.exit_code(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod installer;
pub mod requirements;
pub mod scheduler;
pub mod shell;
pub mod ui;

pub use error::{Result, SetupError};
