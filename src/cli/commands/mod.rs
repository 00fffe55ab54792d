//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and owns the scheduler backend
//! they share.

pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod status;
pub mod uninstall;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
