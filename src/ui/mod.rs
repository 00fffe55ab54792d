//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use pigeoneer_setup::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Pigeoneer setup");
//! ui.success("Watcher registered");
//! ```

pub mod hints;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SetupTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a hint suggesting the next action.
    fn show_hint(&mut self, hint: &str);

    /// Show a boxed key/value summary.
    fn show_summary(&mut self, summary: &Summary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// A titled list of labelled values, shown at the end of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Box title.
    pub title: String,
    /// Rows in display order.
    pub rows: Vec<SummaryRow>,
}

/// One line of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Left-hand label.
    pub label: String,
    /// Right-hand value.
    pub value: String,
}

impl Summary {
    /// Create an empty summary.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push(SummaryRow {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Value of the first row labelled `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    /// Width of the widest label, for column alignment.
    pub fn label_width(&self) -> usize {
        self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0)
    }
}
