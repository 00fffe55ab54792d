//! Scheduled task definition.
//!
//! A [`TaskDefinition`] is built fresh on every install run from the
//! [`InstallContext`](crate::context::InstallContext) and handed to the host
//! scheduler. The scheduler owns the persisted copy; nothing here is saved.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SetupSettings;
use crate::context::{Identity, InstallContext};

/// Name the watcher task is registered under.
///
/// This is the sole lookup key for upgrades and removal and must not change
/// between releases.
pub const TASK_NAME: &str = "PigeoneerTradeWatcher";

/// Everything the host scheduler needs to supervise the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    /// Unique task name.
    pub name: String,
    /// Human-readable description shown in the scheduler UI.
    pub description: String,
    /// Process to launch.
    pub action: TaskAction,
    /// When the task starts.
    pub trigger: TaskTrigger,
    /// Crash recovery.
    pub restart: RestartPolicy,
    /// Battery behaviour.
    pub power: PowerPolicy,
    /// Who the task runs as.
    pub principal: Principal,
}

/// The process launched by the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAction {
    /// Absolute path of the executable.
    pub executable: PathBuf,
    /// Arguments passed to the executable.
    pub arguments: Vec<String>,
    /// Working directory the process inherits.
    pub working_directory: PathBuf,
}

/// What starts the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// When the installing user logs on.
    #[default]
    #[value(name = "logon")]
    #[serde(alias = "logon")]
    AtLogon,
    /// When the machine boots.
    #[value(name = "boot")]
    #[serde(alias = "boot")]
    AtBoot,
}

/// Trigger plus the user it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTrigger {
    /// Trigger kind.
    pub kind: TriggerKind,
    /// User whose logon fires an [`TriggerKind::AtLogon`] trigger.
    pub user: Option<String>,
}

/// Restart-on-exit policy.
///
/// Bounded so a watcher that crashes immediately cannot loop forever, while
/// still riding out transient faults such as the game log not existing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Maximum number of restarts.
    pub max_restarts: u32,
    /// Delay between restarts.
    pub interval: Duration,
}

/// Battery behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerPolicy {
    /// Start the task even when running on battery.
    pub allow_on_battery: bool,
    /// Keep the task running when the machine switches to battery.
    pub keep_running_on_battery: bool,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self {
            allow_on_battery: true,
            keep_running_on_battery: true,
        }
    }
}

/// How the principal authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogonType {
    /// Runs only while the user is logged on, in their session.
    #[default]
    Interactive,
    /// Runs whether or not the user is logged on, without a stored password.
    S4u,
    /// Runs as a built-in service account.
    ServiceAccount,
}

/// Execution identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Qualified user id (`DOMAIN\user` on Windows).
    pub user_id: String,
    /// Logon type.
    pub logon_type: LogonType,
}

impl TaskDefinition {
    /// Build the watcher's definition from the resolved install context.
    ///
    /// The watcher is launched as `<interpreter> <entry script>` from the
    /// base directory; it finds its own config and log from there.
    pub fn for_watcher(ctx: &InstallContext, settings: &SetupSettings) -> Self {
        let user_id = qualified_user(&ctx.identity);

        Self {
            name: TASK_NAME.to_string(),
            description: settings.description.clone(),
            action: TaskAction {
                executable: ctx.paths.interpreter.clone(),
                arguments: vec![ctx.paths.entry_script.display().to_string()],
                working_directory: ctx.base_dir.clone(),
            },
            trigger: TaskTrigger {
                kind: settings.trigger,
                user: match settings.trigger {
                    TriggerKind::AtLogon => Some(user_id.clone()),
                    TriggerKind::AtBoot => None,
                },
            },
            restart: RestartPolicy {
                max_restarts: settings.restart_count,
                interval: Duration::from_secs(settings.restart_interval_secs),
            },
            power: PowerPolicy::default(),
            principal: Principal {
                user_id,
                logon_type: settings.logon_type,
            },
        }
    }
}

fn qualified_user(identity: &Identity) -> String {
    match &identity.domain {
        Some(domain) => format!("{}\\{}", domain, identity.user),
        None => identity.user.clone(),
    }
}
