//! Live config inspection.
//!
//! The watcher reads its settings from a `.env` file. The installer never
//! gates on its content; `status` uses this module to tell the user which
//! credentials still need filling in.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use super::template::CREDENTIAL_ENTRIES;

/// Parses `.env` files into a map of variables.
///
/// Accepts `KEY=value`, `KEY="quoted"`, `KEY='quoted'`, `KEY=` and
/// `# comments`. Lines without `=` are ignored, as the watcher does.
///
/// # Example
///
/// ```
/// use pigeoneer_setup::config::EnvFileParser;
///
/// let vars = EnvFileParser::parse("# bot\nTG_TOKEN=\"123:abc\"\nTG_CHAT=42\n");
/// assert_eq!(vars.get("TG_TOKEN"), Some(&"123:abc".to_string()));
/// assert_eq!(vars.get("TG_CHAT"), Some(&"42".to_string()));
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse env file content into a map of variables.
    pub fn parse(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let (key, value) = line.split_once('=')?;
        Some((key.trim().to_string(), Self::unquote(value.trim()).to_string()))
    }

    fn unquote(value: &str) -> &str {
        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        if quoted {
            &value[1..value.len() - 1]
        } else {
            value
        }
    }

    /// Load and parse an env file.
    pub fn load(path: &Path) -> Result<HashMap<String, String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::parse(&content))
    }
}

/// Credential keys whose value is missing, empty, or still the placeholder.
pub fn unfilled_credentials(vars: &HashMap<String, String>) -> Vec<&'static str> {
    CREDENTIAL_ENTRIES
        .iter()
        .filter(|entry| match vars.get(entry.key) {
            Some(value) => value.is_empty() || value == entry.placeholder,
            None => true,
        })
        .map(|entry| entry.key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::template::{CHAT_PLACEHOLDER, TOKEN_PLACEHOLDER};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn skips_comments_and_blank_lines() {
        let vars = EnvFileParser::parse("\n# TG_TOKEN=commented\n\nTG_CHAT=7\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("TG_CHAT"), Some(&"7".to_string()));
    }

    #[test]
    fn keeps_equals_inside_values() {
        let vars = EnvFileParser::parse("CLIENT_LOG=C:\\logs\\a=b.txt\n");
        assert_eq!(vars.get("CLIENT_LOG"), Some(&"C:\\logs\\a=b.txt".to_string()));
    }

    #[test]
    fn strips_matching_quotes_only() {
        let vars = EnvFileParser::parse("A='x y'\nB=\"z\nC=\"\n");
        assert_eq!(vars.get("A"), Some(&"x y".to_string()));
        assert_eq!(vars.get("B"), Some(&"\"z".to_string()));
        assert_eq!(vars.get("C"), Some(&"\"".to_string()));
    }

    #[test]
    fn ignores_lines_without_equals() {
        let vars = EnvFileParser::parse("export\nTG_CHAT = 9 \n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("TG_CHAT"), Some(&"9".to_string()));
    }

    #[test]
    fn fresh_template_has_all_credentials_unfilled() {
        let vars = EnvFileParser::parse(&format!(
            "TG_TOKEN={}\nTG_CHAT={}\n",
            TOKEN_PLACEHOLDER, CHAT_PLACEHOLDER
        ));
        assert_eq!(unfilled_credentials(&vars), vec!["TG_TOKEN", "TG_CHAT"]);
    }

    #[test]
    fn filled_credentials_are_not_reported() {
        let vars = EnvFileParser::parse("TG_TOKEN=123:abc\nTG_CHAT=\n");
        assert_eq!(unfilled_credentials(&vars), vec!["TG_CHAT"]);
    }

    #[test]
    fn missing_keys_count_as_unfilled() {
        let vars = EnvFileParser::parse("CLIENT_LOG=/tmp/Client.txt\n");
        assert_eq!(unfilled_credentials(&vars).len(), 2);
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "TG_TOKEN=t\n").unwrap();
        let vars = EnvFileParser::load(&path).unwrap();
        assert_eq!(vars.get("TG_TOKEN"), Some(&"t".to_string()));
    }

    #[test]
    fn load_missing_file_mentions_path() {
        let err = EnvFileParser::load(Path::new("/nonexistent/.env")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/.env"));
    }
}
