//! Progress reporting for TTY and non-TTY environments.
//!
//! TTY mode: one indicatif spinner line per day being scanned.
//! Non-TTY mode: hidden bars; the per-day log lines are the progress.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Spinner line for one day scan.
fn day_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:<12} {wide_msg:.dim}")
        .expect("invalid template")
}

/// Central progress context managing multi-progress lines.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Create new context, detecting TTY automatically.
    pub fn new() -> Self {
        let is_tty = std::io::stderr().is_terminal();
        Self {
            multi: MultiProgress::new(),
            is_tty,
        }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    /// Create a per-day spinner line.
    ///
    /// TTY: visible spinner, ticking on its own.
    /// Non-TTY: hidden (no-op).
    pub fn day_line(&self, label: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(day_style());
        pb.set_prefix(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}
