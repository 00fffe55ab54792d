//! Host command execution.
//!
//! Scheduler backends talk to the host through [`CommandRunner`] so tests
//! can substitute a recording runner for `schtasks`/`systemctl`.

use crate::error::{Result, SetupError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a host command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// The most useful diagnostic text: stderr if any, otherwise stdout.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// A program invocation, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a spec for `program` with `args`.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Render as a single line for logs and messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains(' ') {
                format!("\"{}\"", a)
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

/// Executes host commands.
pub trait CommandRunner {
    /// Run a command to completion, capturing its output.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not
    /// as an error; `Err` means the command could not be run at all.
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

/// Runs commands on the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let start = Instant::now();
        tracing::debug!("Running: {}", spec.display());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| {
            tracing::debug!("Failed to spawn {}: {}", spec.program, e);
            SetupError::SpawnFailed {
                command: spec.display(),
                source: e,
            }
        })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            tracing::debug!(
                "{} exited with {:?}: {}",
                spec.program,
                output.status.code(),
                stderr.trim()
            );
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_display_quotes_arguments_with_spaces() {
        let spec = CommandSpec::new("schtasks", ["/Run", "/TN", "My Task"]);
        assert_eq!(spec.display(), "schtasks /Run /TN \"My Task\"");
    }

    #[test]
    fn diagnostic_prefers_stderr() {
        let result = CommandResult::failure(
            Some(1),
            "out".to_string(),
            "ERROR: denied\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.diagnostic(), "ERROR: denied");
    }

    #[test]
    fn diagnostic_falls_back_to_stdout_then_code() {
        let result =
            CommandResult::failure(Some(3), "note\n".to_string(), String::new(), Duration::ZERO);
        assert_eq!(result.diagnostic(), "note");

        let result = CommandResult::failure(Some(3), String::new(), String::new(), Duration::ZERO);
        assert_eq!(result.diagnostic(), "exited with code 3");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_output() {
        let result = SystemRunner
            .run(&CommandSpec::new("sh", ["-c", "echo hello; echo oops >&2"]))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_non_zero_exit() {
        let result = SystemRunner
            .run(&CommandSpec::new("sh", ["-c", "exit 4"]))
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(4));
    }

    #[test]
    fn system_runner_errors_for_missing_program() {
        let err = SystemRunner
            .run(&CommandSpec::new("definitely-not-a-real-program-xyz", Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(
            &err,
            SetupError::SpawnFailed { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        ));
        assert!(err.to_string().contains("definitely-not-a-real-program-xyz"));
    }
}
