//! Host command execution and environment detection.

pub mod command;
pub mod platform;

pub use command::{CommandResult, CommandRunner, CommandSpec, SystemRunner};
pub use platform::is_ci;
