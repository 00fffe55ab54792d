//! systemd user-unit backend for Linux hosts.
//!
//! The task becomes `~/.config/systemd/user/<name>.service`, enabled under
//! `default.target` so it starts with the user's session.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RegisterMode, SchedulerError, TaskDefinition, TaskScheduler, TriggerKind};
use crate::shell::{CommandRunner, CommandSpec, SystemRunner};

const SYSTEMCTL: &str = "systemctl";

/// Task scheduler backed by `systemctl --user`.
#[derive(Debug, Clone)]
pub struct SystemdUser<R = SystemRunner> {
    unit_dir: PathBuf,
    runner: R,
}

impl SystemdUser<SystemRunner> {
    /// Backend for the current user's unit directory.
    ///
    /// Returns `None` when the user's config directory cannot be determined.
    pub fn for_current_user() -> Option<Self> {
        let unit_dir = dirs::config_dir()?.join("systemd").join("user");
        Some(Self::with_runner(unit_dir, SystemRunner))
    }
}

impl<R: CommandRunner> SystemdUser<R> {
    /// Backend writing units to `unit_dir` and running `systemctl` via `runner`.
    pub fn with_runner(unit_dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            unit_dir: unit_dir.into(),
            runner,
        }
    }

    /// Directory unit files are written to.
    pub fn unit_dir(&self) -> &Path {
        &self.unit_dir
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Path of the unit file for task `name`.
    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.unit_dir.join(unit_name(name))
    }

    fn systemctl(&self, operation: &str, args: &[&str]) -> Result<(), SchedulerError> {
        let spec = CommandSpec::new(
            SYSTEMCTL,
            std::iter::once("--user").chain(args.iter().copied()),
        );
        let result = self.runner.run(&spec)?;
        if result.success {
            Ok(())
        } else {
            Err(SchedulerError::rejected(operation, result.diagnostic()))
        }
    }
}

impl<R: CommandRunner> TaskScheduler for SystemdUser<R> {
    fn register(&mut self, def: &TaskDefinition, mode: RegisterMode) -> Result<(), SchedulerError> {
        let path = self.unit_path(&def.name);
        if mode == RegisterMode::CreateOnly && path.exists() {
            return Err(SchedulerError::rejected(
                "create",
                format!("{} already exists", path.display()),
            ));
        }

        if def.trigger.kind == TriggerKind::AtBoot {
            tracing::warn!(
                "User units only start at boot when lingering is enabled (loginctl enable-linger)"
            );
        }

        fs::create_dir_all(&self.unit_dir)?;
        fs::write(&path, render_unit(def))?;
        tracing::debug!("Wrote unit file {}", path.display());

        let unit = unit_name(&def.name);
        self.systemctl("reload", &["daemon-reload"])?;
        self.systemctl("enable", &["enable", &unit])
    }

    fn delete(&mut self, name: &str) -> Result<(), SchedulerError> {
        let path = self.unit_path(name);
        if !path.exists() {
            return Err(SchedulerError::NotFound {
                name: name.to_string(),
            });
        }

        let unit = unit_name(name);
        self.systemctl("delete", &["disable", "--now", &unit])?;
        fs::remove_file(&path)?;
        self.systemctl("reload", &["daemon-reload"])
    }

    fn start(&mut self, name: &str) -> Result<(), SchedulerError> {
        if !self.unit_path(name).exists() {
            return Err(SchedulerError::NotFound {
                name: name.to_string(),
            });
        }
        self.systemctl("start", &["start", &unit_name(name)])
    }

    fn is_registered(&mut self, name: &str) -> Result<bool, SchedulerError> {
        Ok(self.unit_path(name).exists())
    }

    fn removal_command(&self, name: &str) -> String {
        format!(
            "systemctl --user disable --now {} && rm \"{}\"",
            unit_name(name),
            self.unit_path(name).display()
        )
    }
}

fn unit_name(name: &str) -> String {
    format!("{}.service", name)
}

/// Render `def` as a systemd service unit.
///
/// The restart policy maps onto `Restart=always` with a start limit of
/// `max_restarts + 1` starts, so systemd gives up after the configured number
/// of restarts. Power settings have no user-unit equivalent.
pub fn render_unit(def: &TaskDefinition) -> String {
    let interval = def.restart.interval.as_secs().max(1);
    let burst = def.restart.max_restarts.saturating_add(1);
    // The window must cover every restart delay or the limit never trips.
    let window = interval
        .saturating_mul(u64::from(burst))
        .saturating_add(interval);
    let exec_start = std::iter::once(def.action.executable.display().to_string())
        .chain(def.action.arguments.iter().cloned())
        .map(|a| quote_exec_arg(&escape_specifiers(&a)))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "[Unit]\n\
         Description={description}\n\
         StartLimitIntervalSec={window}\n\
         StartLimitBurst={burst}\n\
         \n\
         [Service]\n\
         Type=simple\n\
         WorkingDirectory={working_directory}\n\
         ExecStart={exec_start}\n\
         Restart=always\n\
         RestartSec={interval}\n\
         \n\
         [Install]\n\
         WantedBy=default.target\n",
        description = def.description,
        window = window,
        burst = burst,
        working_directory = escape_specifiers(&def.action.working_directory.display().to_string()),
        exec_start = exec_start,
        interval = interval,
    )
}

/// `%` starts a unit specifier; a literal one is written `%%`.
fn escape_specifiers(value: &str) -> String {
    value.replace('%', "%%")
}

/// `WorkingDirectory=` takes the path verbatim, so only `ExecStart=`
/// arguments are quoted.
fn quote_exec_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"', '\\']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::scheduler::*;
    use crate::shell::CommandResult;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
            let line = spec.display();
            self.calls.borrow_mut().push(line.clone());
            match self.fail_on {
                Some(word) if line.contains(word) => Ok(CommandResult::failure(
                    Some(1),
                    String::new(),
                    format!("Failed to {word} unit"),
                    Duration::ZERO,
                )),
                _ => Ok(CommandResult::success(
                    String::new(),
                    String::new(),
                    Duration::ZERO,
                )),
            }
        }
    }

    fn definition() -> TaskDefinition {
        TaskDefinition {
            name: TASK_NAME.to_string(),
            description: "Pigeoneer trade watcher".to_string(),
            action: TaskAction {
                executable: PathBuf::from("/usr/bin/python3"),
                arguments: vec!["/home/exile/pigeoneer/run.py".to_string()],
                working_directory: PathBuf::from("/home/exile/pigeoneer"),
            },
            trigger: TaskTrigger {
                kind: TriggerKind::AtLogon,
                user: Some("exile".to_string()),
            },
            restart: RestartPolicy {
                max_restarts: 3,
                interval: Duration::from_secs(60),
            },
            power: PowerPolicy::default(),
            principal: Principal {
                user_id: "exile".to_string(),
                logon_type: LogonType::Interactive,
            },
        }
    }

    fn backend(temp: &TempDir) -> SystemdUser<RecordingRunner> {
        SystemdUser::with_runner(temp.path().join("user"), RecordingRunner::default())
    }

    #[test]
    fn unit_carries_restart_policy() {
        let unit = render_unit(&definition());
        assert!(unit.contains("Restart=always"));
        assert!(unit.contains("RestartSec=60"));
        assert!(unit.contains("StartLimitBurst=4"));
    }

    #[test]
    fn unit_launches_entry_script_from_base_dir() {
        let unit = render_unit(&definition());
        assert!(unit.contains("ExecStart=/usr/bin/python3 /home/exile/pigeoneer/run.py"));
        assert!(unit.contains("WorkingDirectory=/home/exile/pigeoneer"));
        assert!(unit.contains("WantedBy=default.target"));
    }

    #[test]
    fn unit_quotes_paths_with_spaces() {
        let mut def = definition();
        def.action.arguments = vec!["/home/exile/My Games/run.py".to_string()];
        let unit = render_unit(&def);
        assert!(unit.contains("ExecStart=/usr/bin/python3 \"/home/exile/My Games/run.py\""));
    }

    #[test]
    fn working_directory_with_spaces_is_written_verbatim() {
        let mut def = definition();
        def.action.working_directory = PathBuf::from("/home/exile/My Games/pigeoneer");
        let unit = render_unit(&def);
        assert!(unit.contains("WorkingDirectory=/home/exile/My Games/pigeoneer\n"));
    }

    #[test]
    fn percent_signs_are_escaped() {
        let mut def = definition();
        def.action.working_directory = PathBuf::from("/home/exile/100%");
        def.action.arguments = vec!["/home/exile/100%/run.py".to_string()];
        let unit = render_unit(&def);
        assert!(unit.contains("WorkingDirectory=/home/exile/100%%\n"));
        assert!(unit.contains("ExecStart=/usr/bin/python3 /home/exile/100%%/run.py"));
    }

    #[test]
    fn huge_restart_policy_saturates() {
        let mut def = definition();
        def.restart.max_restarts = u32::MAX;
        def.restart.interval = Duration::from_secs(u64::MAX);
        let unit = render_unit(&def);
        assert!(unit.contains(&format!("StartLimitBurst={}", u32::MAX)));
        assert!(unit.contains(&format!("StartLimitIntervalSec={}", u64::MAX)));
    }

    #[test]
    fn register_writes_unit_and_enables_it() {
        let temp = TempDir::new().unwrap();
        let mut systemd = backend(&temp);

        systemd
            .register(&definition(), RegisterMode::Overwrite)
            .unwrap();

        let path = systemd.unit_path(TASK_NAME);
        assert!(path.exists());
        assert_eq!(
            *systemd.runner().calls.borrow(),
            vec![
                "systemctl --user daemon-reload".to_string(),
                "systemctl --user enable PigeoneerTradeWatcher.service".to_string(),
            ]
        );
        assert!(systemd.is_registered(TASK_NAME).unwrap());
    }

    #[test]
    fn create_only_refuses_existing_unit() {
        let temp = TempDir::new().unwrap();
        let mut systemd = backend(&temp);
        systemd
            .register(&definition(), RegisterMode::Overwrite)
            .unwrap();

        let err = systemd
            .register(&definition(), RegisterMode::CreateOnly)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Rejected { .. }));
    }

    #[test]
    fn delete_missing_unit_is_not_found() {
        let temp = TempDir::new().unwrap();
        let mut systemd = backend(&temp);

        let err = systemd.delete(TASK_NAME).unwrap_err();
        assert!(matches!(err, SchedulerError::NotFound { .. }));
        assert!(systemd.runner().calls.borrow().is_empty());
    }

    #[test]
    fn delete_disables_and_removes_unit() {
        let temp = TempDir::new().unwrap();
        let mut systemd = backend(&temp);
        systemd
            .register(&definition(), RegisterMode::Overwrite)
            .unwrap();

        systemd.delete(TASK_NAME).unwrap();

        assert!(!systemd.unit_path(TASK_NAME).exists());
        assert!(systemd
            .runner()
            .calls
            .borrow()
            .contains(&"systemctl --user disable --now PigeoneerTradeWatcher.service".to_string()));
    }

    #[test]
    fn start_failure_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut systemd = SystemdUser::with_runner(
            temp.path().join("user"),
            RecordingRunner {
                fail_on: Some("start"),
                ..RecordingRunner::default()
            },
        );
        systemd
            .register(&definition(), RegisterMode::Overwrite)
            .unwrap();

        let err = systemd.start(TASK_NAME).unwrap_err();
        assert_eq!(err.to_string(), "start rejected: Failed to start unit");
    }

    #[test]
    fn removal_command_names_unit() {
        let temp = TempDir::new().unwrap();
        let systemd = backend(&temp);
        let cmd = systemd.removal_command(TASK_NAME);
        assert!(cmd.starts_with("systemctl --user disable --now PigeoneerTradeWatcher.service"));
    }
}
