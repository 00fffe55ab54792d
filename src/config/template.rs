//! Config template and live config bootstrapping.
//!
//! The template (`.env.example`) is rendered once from a fixed skeleton and
//! never rewritten. The live config (`.env`) is a verbatim copy made the
//! first time it is missing; after that it belongs to the user.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A documented key with its placeholder value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Variable name.
    pub key: &'static str,
    /// Placeholder written into the template.
    pub placeholder: &'static str,
    /// Comment lines written above the entry.
    pub doc: &'static [&'static str],
}

/// Telegram bot token placeholder.
pub const TOKEN_PLACEHOLDER: &str = "your_bot_token_here";

/// Telegram chat id placeholder.
pub const CHAT_PLACEHOLDER: &str = "your_chat_id_here";

/// Credential entries, in template order.
pub const CREDENTIAL_ENTRIES: &[TemplateEntry] = &[
    TemplateEntry {
        key: "TG_TOKEN",
        placeholder: TOKEN_PLACEHOLDER,
        doc: &["Telegram bot token from @BotFather"],
    },
    TemplateEntry {
        key: "TG_CHAT",
        placeholder: CHAT_PLACEHOLDER,
        doc: &["Chat id that receives trade notifications (message @userinfobot to find yours)"],
    },
];

/// Game client log the watcher tails.
pub const CLIENT_LOG_KEY: &str = "CLIENT_LOG";

/// Install layout a client log guess is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallLayout {
    /// Installed through Steam.
    Steam,
    /// Installed with the publisher's standalone client.
    Standalone,
}

/// A guessed location of the game's client log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLogGuess {
    /// Which layout this path belongs to.
    pub layout: InstallLayout,
    /// Game title, for the comment.
    pub game: &'static str,
    /// Guessed path.
    pub path: PathBuf,
}

const GAMES: &[&str] = &["Path of Exile", "Path of Exile 2"];

/// Default client log guesses for this host, Steam first.
pub fn client_log_guesses() -> Vec<ClientLogGuess> {
    let home = dirs::home_dir().unwrap_or_default();
    client_log_guesses_for(cfg!(windows), &home)
}

/// Client log guesses for a given platform and home directory.
pub fn client_log_guesses_for(windows: bool, home: &Path) -> Vec<ClientLogGuess> {
    let (steam_root, standalone_root) = if windows {
        (
            PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common"),
            PathBuf::from(r"C:\Program Files (x86)\Grinding Gear Games"),
        )
    } else {
        (
            home.join(".local/share/Steam/steamapps/common"),
            home.join(".wine/drive_c/Program Files (x86)/Grinding Gear Games"),
        )
    };

    let mut guesses = Vec::new();
    for layout in [InstallLayout::Steam, InstallLayout::Standalone] {
        let root = match layout {
            InstallLayout::Steam => &steam_root,
            InstallLayout::Standalone => &standalone_root,
        };
        for &game in GAMES {
            guesses.push(ClientLogGuess {
                layout,
                game,
                path: join_log(root, game, windows),
            });
        }
    }
    guesses
}

fn join_log(root: &Path, game_dir: &str, windows: bool) -> PathBuf {
    // Windows guesses always use backslashes, whatever the host.
    if windows {
        PathBuf::from(format!(r"{}\{}\logs\Client.txt", root.display(), game_dir))
    } else {
        root.join(game_dir).join("logs").join("Client.txt")
    }
}

/// Render the template text.
///
/// Only the first Steam guess is active; every other guess is written as a
/// commented-out alternative.
pub fn render_template(guesses: &[ClientLogGuess]) -> String {
    let mut out = String::from(
        "# Pigeoneer trade watcher configuration\n\
         #\n\
         # Copy this file to .env (the installer does this on first run),\n\
         # replace the placeholder values, then run the installer again.\n\
         \n",
    );

    for entry in CREDENTIAL_ENTRIES {
        for line in entry.doc {
            out.push_str(&format!("# {}\n", line));
        }
        out.push_str(&format!("{}={}\n\n", entry.key, entry.placeholder));
    }

    out.push_str("# Game client log to watch. Uncomment the line matching your install.\n");

    let mut active_written = false;
    for layout in [InstallLayout::Steam, InstallLayout::Standalone] {
        let label = match layout {
            InstallLayout::Steam => "Steam",
            InstallLayout::Standalone => "Standalone client",
        };
        let matching: Vec<&ClientLogGuess> =
            guesses.iter().filter(|g| g.layout == layout).collect();
        if matching.is_empty() {
            continue;
        }

        out.push_str(&format!("#\n# {}:\n", label));
        for guess in matching {
            out.push_str(&format!("#   {}\n", guess.game));
            let line = format!("{}={}", CLIENT_LOG_KEY, guess.path.display());
            if !active_written && layout == InstallLayout::Steam {
                out.push_str(&format!("{}\n", line));
                active_written = true;
            } else {
                out.push_str(&format!("# {}\n", line));
            }
        }
    }

    out
}

/// Write the template into `dir` unless a file is already there.
///
/// Returns the template path. An existing template is never touched, even
/// if its content differs from what would be rendered today.
pub fn ensure_template(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if path.exists() {
        tracing::debug!("Template already present at {}", path.display());
        return Ok(path);
    }

    let content = render_template(&client_log_guesses());
    fs::write(&path, content)?;
    tracing::debug!("Wrote template to {}", path.display());
    Ok(path)
}

/// Result of [`ensure_live_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveConfigStatus {
    /// Path of the live config.
    pub path: PathBuf,
    /// Whether this call created it from the template.
    pub created: bool,
}

/// Copy the template to the live config if the live config is missing.
///
/// `created == true` means the live config holds placeholders and the
/// watcher must not be started yet.
pub fn ensure_live_config(dir: &Path, file_name: &str, template: &Path) -> Result<LiveConfigStatus> {
    let path = dir.join(file_name);
    if path.exists() {
        return Ok(LiveConfigStatus {
            path,
            created: false,
        });
    }

    fs::copy(template, &path)?;
    tracing::debug!(
        "Created live config {} from {}",
        path.display(),
        template.display()
    );
    Ok(LiveConfigStatus {
        path,
        created: true,
    })
}
