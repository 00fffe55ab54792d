//! Hint text suggesting the logical next action after a command.

use crate::scheduler::TriggerKind;
use std::path::Path;

/// After the live config was created from the template.
pub fn after_config_created(config: &Path) -> String {
    format!(
        "Fill in TG_TOKEN and TG_CHAT in {}, then run `pigeoneer-setup` again.",
        config.display()
    )
}

/// After the task was registered but could not be started.
pub fn after_start_failed(task: &str, trigger: TriggerKind) -> String {
    let when = match trigger {
        TriggerKind::AtLogon => "your next logon",
        TriggerKind::AtBoot => "the next boot",
    };
    format!(
        "The task starts at {}, or start '{}' from your scheduler now.",
        when, task
    )
}

/// After registration failed.
pub fn after_registration_failed() -> &'static str {
    "Re-run `pigeoneer-setup` from an elevated prompt, or check `pigeoneer-setup --debug` output."
}

/// When the interpreter could not be found.
pub fn missing_interpreter(name: &str) -> String {
    format!(
        "Install Python 3 so that `{}` is on PATH, or set `interpreter:` in pigeoneer.yml.",
        name
    )
}

/// When the entry script is not in the base directory.
pub fn missing_entry_script() -> &'static str {
    "Run pigeoneer-setup from the watcher's folder, or point --dir at it."
}

/// When `status` finds unfilled credentials.
pub fn fill_credentials(keys: &[&str], config: &Path) -> String {
    format!("Set {} in {}.", keys.join(" and "), config.display())
}

/// When `status` finds no registered task.
pub fn not_installed() -> &'static str {
    "Run `pigeoneer-setup install` to register the watcher."
}
