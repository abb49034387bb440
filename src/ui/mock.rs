//! Mock UI implementation for testing.
//!
//! `MockUI` implements [`UserInterface`] and records every interaction
//! for later assertion.
//!
//! # Example
//!
//! ```
//! use muzzle::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Checked 4 sample(s)");
//! ui.success("All rules pass");
//!
//! assert!(ui.has_message("Checked 4"));
//! assert!(ui.successes().contains(&"All rules pass".to_string()));
//! ```

use super::{MatrixProgress, NoopSpinner, OutputMode, SpinnerHandle, UserInterface};

/// Records UI interactions instead of printing them.
#[derive(Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
    progress: Vec<(usize, String)>,
}

impl MockUI {
    /// Create a MockUI in Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Messages of spinners that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Progress bars started, as (total, message).
    pub fn progress(&self) -> &[(usize, String)] {
        &self.progress
    }

    /// All messages joined by newlines, for substring checks over a report.
    pub fn output(&self) -> String {
        self.messages.join("\n")
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(NoopSpinner)
    }

    fn start_progress(&mut self, total: usize, message: &str) -> MatrixProgress {
        self.progress.push((total, message.to_string()));
        MatrixProgress::hidden(total)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
