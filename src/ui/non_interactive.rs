//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, Summary, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Writes plain, unstyled lines. Warnings and errors go to stderr so
/// scripted installs can capture the summary from stdout alone.
pub struct NonInteractiveUI {
    mode: OutputMode,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self { mode, is_ci }
    }

    /// Whether a CI environment was detected.
    pub fn is_ci(&self) -> bool {
        self.is_ci
    }
}

/// Render a summary as aligned plain-text lines.
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let width = summary.label_width();
    std::iter::once(format!("{}:", summary.title))
        .chain(
            summary
                .rows
                .iter()
                .map(|row| format!("  {:<width$}  {}", row.label, row.value)),
        )
        .collect()
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_header(&mut self, title: &str) {
        // No banner in CI.
        if self.mode.shows_progress() && !self.is_ci {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_summary(&mut self, summary: &Summary) {
        if !self.mode.shows_status() {
            return;
        }
        println!();
        for line in summary_lines(summary) {
            println!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn ci_mode_is_stored() {
        assert!(NonInteractiveUI::with_ci(OutputMode::Normal, true).is_ci());
        assert!(!NonInteractiveUI::with_ci(OutputMode::Normal, false).is_ci());
    }

    #[test]
    fn summary_lines_align_labels() {
        let summary = Summary::new("Installed")
            .row("Config", "/w/.env")
            .row("Remove with", "pigeoneer-setup uninstall");
        assert_eq!(
            summary_lines(&summary),
            vec![
                "Installed:".to_string(),
                "  Config       /w/.env".to_string(),
                "  Remove with  pigeoneer-setup uninstall".to_string(),
            ]
        );
    }
}
