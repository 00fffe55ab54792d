//! Installer settings loading.
//!
//! Every setting has a default matching the watcher this installer ships
//! with. A `pigeoneer.yml` in the base directory may override any of them:
//!
//! ```yaml
//! interpreter: C:\Python312\pythonw.exe
//! trigger: boot
//! restart_count: 5
//! ```

use crate::error::{Result, SetupError};
use crate::scheduler::{LogonType, TriggerKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file name, looked up in the base directory.
pub const SETTINGS_FILE: &str = "pigeoneer.yml";

/// Task Scheduler accepts at most 999 restarts.
pub const MAX_RESTART_COUNT: u32 = 999;

/// Task Scheduler accepts a restart interval of at most 31 days.
pub const MAX_RESTART_INTERVAL_SECS: u64 = 31 * 24 * 60 * 60;

/// Installer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSettings {
    /// Interpreter binary name (searched on PATH) or path.
    pub interpreter: String,

    /// Watcher entry script, relative to the base directory.
    pub entry_script: PathBuf,

    /// Template config file name.
    pub template_file: String,

    /// Live config file name.
    pub live_config_file: String,

    /// Where the watcher writes its log; defaults under the local data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// What starts the task.
    pub trigger: TriggerKind,

    /// How the task principal logs on.
    pub logon_type: LogonType,

    /// Restarts allowed after the watcher exits.
    pub restart_count: u32,

    /// Seconds between restarts.
    pub restart_interval_secs: u64,

    /// Description shown in the scheduler.
    pub description: String,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter().to_string(),
            entry_script: PathBuf::from("run.py"),
            template_file: ".env.example".to_string(),
            live_config_file: ".env".to_string(),
            log_file: None,
            trigger: TriggerKind::AtLogon,
            logon_type: LogonType::Interactive,
            restart_count: 3,
            restart_interval_secs: 60,
            description: "Pigeoneer trade watcher: forwards Path of Exile trade whispers to Telegram"
                .to_string(),
        }
    }
}

/// The windowless interpreter on Windows; plain python3 elsewhere.
fn default_interpreter() -> &'static str {
    if cfg!(windows) {
        "pythonw.exe"
    } else {
        "python3"
    }
}

impl SetupSettings {
    /// Load settings for a base directory.
    ///
    /// Returns defaults when no settings file exists.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(SETTINGS_FILE);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", SETTINGS_FILE, base_dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content, &path)
    }

    /// Parse settings YAML; `path` is used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self =
            serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let out_of_range = |message: String| SetupError::ConfigParseError {
            path: path.to_path_buf(),
            message,
        };

        if self.restart_count > MAX_RESTART_COUNT {
            return Err(out_of_range(format!(
                "restart_count must be at most {}, got {}",
                MAX_RESTART_COUNT, self.restart_count
            )));
        }
        if self.restart_interval_secs > MAX_RESTART_INTERVAL_SECS {
            return Err(out_of_range(format!(
                "restart_interval_secs must be at most {} (31 days), got {}",
                MAX_RESTART_INTERVAL_SECS, self.restart_interval_secs
            )));
        }
        Ok(())
    }

    /// Resolved watcher log path.
    ///
    /// The watcher logs to `NavalisOracle/agent.log` under the local data
    /// directory (`%LOCALAPPDATA%` on Windows) unless overridden.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_default()
            .join("NavalisOracle")
            .join("agent.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_shipped_watcher() {
        let settings = SetupSettings::default();
        assert_eq!(settings.entry_script, PathBuf::from("run.py"));
        assert_eq!(settings.template_file, ".env.example");
        assert_eq!(settings.live_config_file, ".env");
        assert_eq!(settings.restart_count, 3);
        assert_eq!(settings.restart_interval_secs, 60);
        assert_eq!(settings.trigger, TriggerKind::AtLogon);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = SetupSettings::load(temp.path()).unwrap();
        assert_eq!(settings, SetupSettings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "trigger: boot\nrestart_count: 5\nlogon_type: s4u\n",
        )
        .unwrap();

        let settings = SetupSettings::load(temp.path()).unwrap();
        assert_eq!(settings.trigger, TriggerKind::AtBoot);
        assert_eq!(settings.restart_count, 5);
        assert_eq!(settings.logon_type, LogonType::S4u);
        assert_eq!(settings.restart_interval_secs, 60);
    }

    #[test]
    fn kebab_case_trigger_names_are_accepted() {
        let settings = SetupSettings::parse("trigger: at-boot\n", Path::new("x.yml")).unwrap();
        assert_eq!(settings.trigger, TriggerKind::AtBoot);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let settings = SetupSettings::parse("  \n", Path::new("pigeoneer.yml")).unwrap();
        assert_eq!(settings, SetupSettings::default());
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = SetupSettings::parse("restart_count: [oops", Path::new("/x/pigeoneer.yml"))
            .unwrap_err();
        assert!(matches!(err, SetupError::ConfigParseError { .. }));
        assert!(err.to_string().contains("/x/pigeoneer.yml"));
    }

    #[test]
    fn restart_count_is_bounded() {
        let path = Path::new("/x/pigeoneer.yml");
        assert!(SetupSettings::parse("restart_count: 999\n", path).is_ok());

        let err = SetupSettings::parse("restart_count: 4294967295\n", path).unwrap_err();
        assert!(matches!(err, SetupError::ConfigParseError { .. }));
        assert!(err.to_string().contains("restart_count"));
    }

    #[test]
    fn restart_interval_is_bounded() {
        let path = Path::new("/x/pigeoneer.yml");
        assert!(SetupSettings::parse("restart_interval_secs: 2678400\n", path).is_ok());

        let err = SetupSettings::parse("restart_interval_secs: 18446744073709551615\n", path)
            .unwrap_err();
        assert!(matches!(err, SetupError::ConfigParseError { .. }));
        assert!(err.to_string().contains("restart_interval_secs"));
    }

    #[test]
    fn explicit_log_file_wins() {
        let settings = SetupSettings {
            log_file: Some(PathBuf::from("/var/log/watcher.log")),
            ..SetupSettings::default()
        };
        assert_eq!(settings.log_path(), PathBuf::from("/var/log/watcher.log"));
    }

    #[test]
    fn default_log_path_ends_with_agent_log() {
        let path = SetupSettings::default().log_path();
        assert!(path.ends_with("NavalisOracle/agent.log"));
    }
}
