//! Installer settings and watcher config bootstrapping.
//!
//! - Installer settings (`pigeoneer.yml`) in [`settings`]
//! - Template and live config creation in [`template`]
//! - Live config inspection in [`env_file`]
//!
//! # Example
//!
//! ```
//! use pigeoneer_setup::config::{ensure_live_config, ensure_template};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let template = ensure_template(temp.path(), ".env.example").unwrap();
//!
//! let first = ensure_live_config(temp.path(), ".env", &template).unwrap();
//! assert!(first.created);
//!
//! let second = ensure_live_config(temp.path(), ".env", &template).unwrap();
//! assert!(!second.created);
//! ```

pub mod env_file;
pub mod settings;
pub mod template;

pub use env_file::{unfilled_credentials, EnvFileParser};
pub use settings::{
    SetupSettings, MAX_RESTART_COUNT, MAX_RESTART_INTERVAL_SECS, SETTINGS_FILE,
};
pub use template::{
    client_log_guesses, ensure_live_config, ensure_template, render_template, ClientLogGuess,
    InstallLayout, LiveConfigStatus,
};
