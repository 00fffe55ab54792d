//! PATH probing for executables.
//!
//! Tool lookup iterates over PATH entries directly instead of shelling out to
//! `which`/`where`, whose behaviour differs across systems and which may be a
//! shell builtin with inconsistent error handling.
//!
//! # Example
//!
//! ```no_run
//! use pigeoneer_setup::requirements::probe::{parse_system_path, resolve_tool_path};
//!
//! if let Some(python) = resolve_tool_path("python3", &parse_system_path()) {
//!     println!("python3 at {}", python.display());
//! }
//! ```

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that is a regular file and executable. When the
/// tool name has no extension, each of `extensions` is also tried in order
/// (this is how `PATHEXT` lookups work on Windows).
pub fn resolve_tool_path_with_extensions(
    tool: &str,
    path_entries: &[PathBuf],
    extensions: &[String],
) -> Option<PathBuf> {
    let has_extension = Path::new(tool).extension().is_some();

    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }

        if has_extension {
            continue;
        }

        for ext in extensions {
            let candidate = dir.join(format!("{}{}", tool, ext));
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Resolve a tool's binary path using the host's executable extensions.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    resolve_tool_path_with_extensions(tool, path_entries, &executable_extensions())
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Extensions tried for bare tool names.
///
/// Reads `PATHEXT` on Windows (falling back to `.EXE;.CMD;.BAT`). Other
/// hosts have no implicit extensions.
pub fn executable_extensions() -> Vec<String> {
    if cfg!(windows) {
        let raw = std::env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT".to_string());
        parse_pathext(&raw)
    } else {
        Vec::new()
    }
}

fn parse_pathext(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(unix)]
    fn create_non_executable_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("python3"));
        create_fake_binary(&dir_b.join("python3"));

        let result = resolve_tool_path_with_extensions("python3", &[dir_a.clone(), dir_b], &[]);
        assert_eq!(result, Some(dir_a.join("python3")));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("empty");
        fs::create_dir_all(&dir).unwrap();

        let result = resolve_tool_path_with_extensions("python3", &[dir], &[]);
        assert!(result.is_none());
    }

    #[test]
    fn resolve_tool_path_ignores_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("python3")).unwrap();

        let result =
            resolve_tool_path_with_extensions("python3", &[temp.path().to_path_buf()], &[]);
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");

        create_non_executable_file(&dir_a.join("python3"));
        create_fake_binary(&dir_b.join("python3"));

        let result =
            resolve_tool_path_with_extensions("python3", &[dir_a, dir_b.clone()], &[]);
        assert_eq!(result, Some(dir_b.join("python3")));
    }

    #[test]
    fn resolve_tool_path_tries_extensions_for_bare_names() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("pythonw.exe"));

        let result = resolve_tool_path_with_extensions(
            "pythonw",
            &[temp.path().to_path_buf()],
            &[".com".to_string(), ".exe".to_string()],
        );
        assert_eq!(result, Some(temp.path().join("pythonw.exe")));
    }

    #[test]
    fn resolve_tool_path_does_not_append_to_named_extension() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("pythonw.exe.exe"));

        let result = resolve_tool_path_with_extensions(
            "pythonw.exe",
            &[temp.path().to_path_buf()],
            &[".exe".to_string()],
        );
        assert!(result.is_none());
    }

    #[test]
    fn parse_pathext_lowercases_and_skips_blanks() {
        assert_eq!(
            parse_pathext(".COM;.EXE;;.BAT "),
            vec![".com".to_string(), ".exe".to_string(), ".bat".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn is_executable_returns_true_for_executable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test_bin");
        create_fake_binary(&path);
        assert!(is_executable(&path));
    }

    #[cfg(unix)]
    #[test]
    fn is_executable_returns_false_for_non_executable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test_file");
        create_non_executable_file(&path);
        assert!(!is_executable(&path));
    }

    #[cfg(unix)]
    #[test]
    fn is_executable_returns_false_for_nonexistent_file() {
        assert!(!is_executable(Path::new("/nonexistent/path/to/file")));
    }
}
