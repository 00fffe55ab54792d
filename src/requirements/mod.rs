//! Prerequisite detection.
//!
//! Before the installer writes or registers anything it must know where the
//! watcher's entry script and interpreter are.
//!
//! # Modules
//!
//! - [`probe`] - PATH lookup for executables
//! - [`checker`] - Entry script and interpreter resolution

pub mod checker;
pub mod probe;

pub use checker::{PrerequisiteChecker, Prerequisites};
pub use probe::{parse_system_path, resolve_tool_path};
