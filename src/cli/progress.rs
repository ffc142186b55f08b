//! Terminal progress display for generation sessions

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::domain::models::ProgressSnapshot;
use crate::domain::ports::ProgressReporter;

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";
const PROGRESS_CHARS: &str = "█▓▒░ ";

/// Create a progress bar for `total` records.
///
/// Hidden when `visible` is false (JSON mode), so callers never branch.
pub fn create_progress_bar(total: u64, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars(PROGRESS_CHARS));
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Drives an indicatif bar from session snapshots
#[derive(Debug, Clone)]
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    /// Reporter that updates `bar`
    pub const fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn report(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_length(u64::from(snapshot.target_count));
        self.bar.set_position(snapshot.accumulated_count as u64);
        self.bar.set_message(status_line(snapshot));
    }
}

fn status_line(snapshot: &ProgressSnapshot) -> String {
    let mut line = format!("attempt {}/{}", snapshot.attempt, snapshot.max_attempts);
    if snapshot.duplicates_skipped > 0 {
        line.push_str(&format!(", {} duplicates", snapshot.duplicates_skipped));
    }
    if let Some(remaining) = snapshot.remaining_ms {
        line.push_str(&format!(", {}s left", remaining.div_ceil(1000)));
    }
    line
}
