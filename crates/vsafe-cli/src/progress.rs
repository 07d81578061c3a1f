//! Progress spinners for long scans.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use vsafe_cache::ProgressEvent;

const TICK: Duration = Duration::from_millis(120);

/// A stderr spinner, hidden when progress is disabled.
#[derive(Clone)]
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(enabled: bool, message: impl Into<String>) -> Self {
        let bar = if enabled {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}: {human_pos}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        if enabled {
            bar.enable_steady_tick(TICK);
        }
        Self { bar }
    }

    /// Callback for `CsvReader::with_progress`.
    pub fn rows(&self) -> impl FnMut(u64) + 'static {
        let bar = self.bar.clone();
        move |rows| bar.set_position(rows)
    }

    /// Callback for `RecordCache::with_progress`.
    pub fn cache(&self) -> impl FnMut(ProgressEvent) + 'static {
        let bar = self.bar.clone();
        move |event| {
            bar.set_message(event.phase.to_string());
            bar.set_length(event.total as u64);
            bar.set_position(event.processed as u64);
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
        self.bar.set_position(0);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
