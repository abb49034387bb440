//! Matrix progress display.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the rules of a matrix run.
///
/// Cloning shares the underlying bar, so a clone can be ticked from the
/// worker threads evaluating rules.
#[derive(Clone)]
pub struct MatrixProgress {
    bar: ProgressBar,
}

impl MatrixProgress {
    /// A bar over `total` rules.
    pub fn new(total: usize, message: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:24.cyan/dim}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░ ");
        bar.set_style(style);
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// A bar that draws nothing but still counts.
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Mark one unit done.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
