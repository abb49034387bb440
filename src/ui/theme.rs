//! Colors and symbols.

use console::Style;

/// Styles used for terminal output.
#[derive(Debug, Clone)]
pub struct MuzzleTheme {
    /// Passing samples (green).
    pub success: Style,
    /// Warnings (orange).
    pub warning: Style,
    /// Failures (red bold).
    pub error: Style,
    /// Secondary text.
    pub dim: Style,
    /// Headers (bold cyan).
    pub header: Style,
    /// Follow-up hints (cyan dim).
    pub hint: Style,
    /// Key labels in key-value displays.
    pub key: Style,
}

impl Default for MuzzleTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl MuzzleTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            key: Style::new().bold(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            key: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(format!("✓ {}", msg)).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(format!("⚠ {}", msg)).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(format!("✗ {}", msg)).to_string()
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        self.dim.apply_to(format!("○ {}", msg)).to_string()
    }

    pub fn format_header(&self, title: &str) -> String {
        self.header.apply_to(format!("▸ {}", title)).to_string()
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}
