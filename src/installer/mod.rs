//! Install orchestration.
//!
//! [`Installer`] drives prerequisites, config bootstrap, task registration
//! and start, and folds the result into an [`InstallationOutcome`] whose
//! [`exit_code`](InstallationOutcome::exit_code) becomes the process status.

pub mod outcome;
pub mod pipeline;

pub use outcome::{InstallationOutcome, EXIT_AWAITING_CONFIG, EXIT_BLOCKED, EXIT_OK};
pub use pipeline::Installer;
