//! Progress display for a generation run

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks artifacts produced by a run
///
/// Hidden progress bars are used when display is disabled so callers don't
/// need to branch.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a visible progress manager
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::new(0),
        }
    }

    /// Create a progress manager that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Configure the bar for a run of `total` artifacts
    pub fn initialize(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(PROGRESS_STYLE.clone());
        self.bar.enable_steady_tick(Duration::from_millis(250));
    }

    /// Record one finished artifact
    pub fn complete_artifact(&self) {
        self.bar.inc(1);
    }

    /// Show a short status next to the bar
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Artifacts recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar, leaving a summary message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Clear the bar after a failed run
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
