//! Windows Task Scheduler backend.
//!
//! `schtasks` flags cannot express a restart policy or battery settings, so
//! the definition is rendered to a Task Scheduler 1.2 XML document and
//! registered with `schtasks /Create /XML`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::{
    LogonType, RegisterMode, SchedulerError, TaskDefinition, TaskScheduler, TriggerKind,
};
use crate::config::{MAX_RESTART_COUNT, MAX_RESTART_INTERVAL_SECS};
use crate::shell::{CommandResult, CommandRunner, CommandSpec, SystemRunner};

const SCHTASKS: &str = "schtasks";

/// Task Scheduler via `schtasks.exe`.
#[derive(Debug, Clone, Default)]
pub struct Schtasks<R = SystemRunner> {
    runner: R,
}

impl Schtasks<SystemRunner> {
    /// Backend that runs the real `schtasks`.
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl<R: CommandRunner> Schtasks<R> {
    /// Backend using a custom command runner.
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, args: &[&str]) -> Result<CommandResult, SchedulerError> {
        let spec = CommandSpec::new(SCHTASKS, args.iter().copied());
        Ok(self.runner.run(&spec)?)
    }
}

impl<R: CommandRunner> TaskScheduler for Schtasks<R> {
    fn register(&mut self, def: &TaskDefinition, mode: RegisterMode) -> Result<(), SchedulerError> {
        let xml = render_task_xml(def, Local::now());

        // schtasks reads the document from disk; keep the file alive until
        // the command returns.
        let mut file = tempfile::Builder::new()
            .prefix("pigeoneer-task-")
            .suffix(".xml")
            .tempfile()?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;
        let xml_path = file.path().display().to_string();

        let mut args = vec!["/Create", "/TN", def.name.as_str(), "/XML", xml_path.as_str()];
        if mode == RegisterMode::Overwrite {
            args.push("/F");
        }

        let result = self.run(&args)?;
        if result.success {
            Ok(())
        } else {
            let operation = match mode {
                RegisterMode::Overwrite => "update",
                RegisterMode::CreateOnly => "create",
            };
            Err(SchedulerError::rejected(operation, result.diagnostic()))
        }
    }

    fn delete(&mut self, name: &str) -> Result<(), SchedulerError> {
        let result = self.run(&["/Delete", "/TN", name, "/F"])?;
        if result.success {
            Ok(())
        } else if is_not_found(&result) {
            Err(SchedulerError::NotFound {
                name: name.to_string(),
            })
        } else {
            Err(SchedulerError::rejected("delete", result.diagnostic()))
        }
    }

    fn start(&mut self, name: &str) -> Result<(), SchedulerError> {
        let result = self.run(&["/Run", "/TN", name])?;
        if result.success {
            Ok(())
        } else if is_not_found(&result) {
            Err(SchedulerError::NotFound {
                name: name.to_string(),
            })
        } else {
            Err(SchedulerError::rejected("start", result.diagnostic()))
        }
    }

    fn is_registered(&mut self, name: &str) -> Result<bool, SchedulerError> {
        let result = self.run(&["/Query", "/TN", name])?;
        Ok(result.success)
    }

    fn removal_command(&self, name: &str) -> String {
        format!("schtasks /Delete /TN \"{}\" /F", name)
    }
}

fn is_not_found(result: &CommandResult) -> bool {
    let text = format!("{} {}", result.stderr, result.stdout).to_lowercase();
    text.contains("cannot find") || text.contains("does not exist")
}

/// Render `def` as a Task Scheduler 1.2 XML document.
pub fn render_task_xml(def: &TaskDefinition, registered_at: DateTime<Local>) -> String {
    let mut xml = String::new();
    let arguments = def
        .action
        .arguments
        .iter()
        .map(|a| quote_argument(a))
        .collect::<Vec<_>>()
        .join(" ");

    // Writing into a String cannot fail.
    let _ = write!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Task version="1.2" xmlns="http://schemas.microsoft.com/windows/2004/02/mit/task">
  <RegistrationInfo>
    <Date>{date}</Date>
    <Author>{author}</Author>
    <Description>{description}</Description>
  </RegistrationInfo>
  <Triggers>
{trigger}  </Triggers>
  <Principals>
    <Principal id="Author">
{principal}      <RunLevel>LeastPrivilege</RunLevel>
    </Principal>
  </Principals>
  <Settings>
    <MultipleInstancesPolicy>IgnoreNew</MultipleInstancesPolicy>
    <DisallowStartIfOnBatteries>{disallow_battery}</DisallowStartIfOnBatteries>
    <StopIfGoingOnBatteries>{stop_on_battery}</StopIfGoingOnBatteries>
    <AllowHardTerminate>true</AllowHardTerminate>
    <StartWhenAvailable>true</StartWhenAvailable>
    <AllowStartOnDemand>true</AllowStartOnDemand>
    <Enabled>true</Enabled>
    <Hidden>false</Hidden>
    <ExecutionTimeLimit>PT0S</ExecutionTimeLimit>
    <RestartOnFailure>
      <Interval>{restart_interval}</Interval>
      <Count>{restart_count}</Count>
    </RestartOnFailure>
  </Settings>
  <Actions Context="Author">
    <Exec>
      <Command>{command}</Command>
      <Arguments>{arguments}</Arguments>
      <WorkingDirectory>{working_directory}</WorkingDirectory>
    </Exec>
  </Actions>
</Task>
"#,
        date = registered_at.format("%Y-%m-%dT%H:%M:%S"),
        author = escape_xml(&def.principal.user_id),
        description = escape_xml(&def.description),
        trigger = render_trigger(def),
        principal = render_principal(def),
        disallow_battery = !def.power.allow_on_battery,
        stop_on_battery = !def.power.keep_running_on_battery,
        restart_interval = iso8601_duration(
            def.restart
                .interval
                .min(Duration::from_secs(MAX_RESTART_INTERVAL_SECS))
        ),
        restart_count = def.restart.max_restarts.min(MAX_RESTART_COUNT),
        command = escape_xml(&def.action.executable.display().to_string()),
        arguments = escape_xml(&arguments),
        working_directory = escape_xml(&def.action.working_directory.display().to_string()),
    );

    xml
}

fn render_trigger(def: &TaskDefinition) -> String {
    match def.trigger.kind {
        TriggerKind::AtLogon => {
            let user = def
                .trigger
                .user
                .as_deref()
                .map(|u| format!("      <UserId>{}</UserId>\n", escape_xml(u)))
                .unwrap_or_default();
            format!(
                "    <LogonTrigger>\n      <Enabled>true</Enabled>\n{}    </LogonTrigger>\n",
                user
            )
        }
        TriggerKind::AtBoot => {
            "    <BootTrigger>\n      <Enabled>true</Enabled>\n    </BootTrigger>\n".to_string()
        }
    }
}

fn render_principal(def: &TaskDefinition) -> String {
    let user = escape_xml(&def.principal.user_id);
    match def.principal.logon_type {
        LogonType::Interactive => format!(
            "      <UserId>{}</UserId>\n      <LogonType>InteractiveToken</LogonType>\n",
            user
        ),
        LogonType::S4u => format!(
            "      <UserId>{}</UserId>\n      <LogonType>S4U</LogonType>\n",
            user
        ),
        // ServiceAccount runs as LocalService.
        LogonType::ServiceAccount => {
            "      <UserId>S-1-5-19</UserId>\n      <LogonType>ServiceAccount</LogonType>\n"
                .to_string()
        }
    }
}

/// Format a duration as an ISO 8601 duration (`PT1M`, `PT1H30S`).
///
/// Task Scheduler rejects intervals under one minute, so shorter values
/// are rounded up to `PT1M`.
pub fn iso8601_duration(d: Duration) -> String {
    let total = d.as_secs().max(60);
    let (hours, rest) = (total / 3600, total % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);

    let mut out = String::from("PT");
    if hours > 0 {
        let _ = write!(out, "{}H", hours);
    }
    if minutes > 0 {
        let _ = write!(out, "{}M", minutes);
    }
    if seconds > 0 {
        let _ = write!(out, "{}S", seconds);
    }
    out
}

/// Quote a command-line argument for `CreateProcess`.
fn quote_argument(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
