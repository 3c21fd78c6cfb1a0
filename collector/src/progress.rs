use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while pages are fetched. A no-op when disabled.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new(enabled: bool, repo: &str) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {prefix}: {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.set_prefix(repo.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn page(&self, what: &str, page: u32, items: usize) {
        self.bar
            .set_message(format!("{what} page {page} ({items} items so far)"));
    }

    pub fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }
}
