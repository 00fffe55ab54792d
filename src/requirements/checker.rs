//! Prerequisite checking.
//!
//! The `PrerequisiteChecker` resolves the two things the watcher needs before
//! anything is written or registered: its entry script and the interpreter
//! that runs it. It has no side effects.

use crate::error::{Result, SetupError};
use crate::requirements::probe::{
    executable_extensions, is_executable, resolve_tool_path_with_extensions,
};
use std::path::{Path, PathBuf};

/// Resolved prerequisites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisites {
    /// Absolute path of the watcher entry script.
    pub entry_script: PathBuf,
    /// Absolute path of the interpreter binary.
    pub interpreter: PathBuf,
}

/// Checks the watcher's prerequisites.
#[derive(Debug, Clone)]
pub struct PrerequisiteChecker {
    entry_script: PathBuf,
    interpreter: String,
    path_entries: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl PrerequisiteChecker {
    /// Create a checker searching the given PATH entries.
    pub fn new(entry_script: &Path, interpreter: &str, path_entries: Vec<PathBuf>) -> Self {
        Self {
            entry_script: entry_script.to_path_buf(),
            interpreter: interpreter.to_string(),
            path_entries,
            extensions: executable_extensions(),
        }
    }

    /// Override the extensions tried for bare interpreter names.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Resolve both prerequisites against `base_dir`.
    ///
    /// The entry script is checked first, so a missing script is reported
    /// even when the interpreter is also missing.
    pub fn check(&self, base_dir: &Path) -> Result<Prerequisites> {
        // The scheduler launches from its own working directory.
        let entry_script = std::path::absolute(self.resolve_entry_script(base_dir)?)?;
        let interpreter = std::path::absolute(self.resolve_interpreter(base_dir)?)?;

        tracing::debug!(
            "Prerequisites resolved: entry={} interpreter={}",
            entry_script.display(),
            interpreter.display()
        );

        Ok(Prerequisites {
            entry_script,
            interpreter,
        })
    }

    fn resolve_entry_script(&self, base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(&self.entry_script);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SetupError::MissingEntryScript { path })
        }
    }

    fn resolve_interpreter(&self, base_dir: &Path) -> Result<PathBuf> {
        let missing = || SetupError::MissingInterpreter {
            name: self.interpreter.clone(),
        };

        // A configured path is checked as-is; a bare name is searched for.
        let as_path = Path::new(&self.interpreter);
        if as_path.components().count() > 1 {
            let path = base_dir.join(as_path);
            return if path.is_file() && is_executable(&path) {
                Ok(path)
            } else {
                Err(missing())
            };
        }

        resolve_tool_path_with_extensions(&self.interpreter, &self.path_entries, &self.extensions)
            .ok_or_else(missing)
    }
}
