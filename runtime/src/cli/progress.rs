//! Progress display while a sitemap index is being resolved.

use crate::loader::LoadObserver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "  {bar:30.cyan/blue} {pos}/{len} {wide_msg}";

/// Spinner for the initial fetch, switching to a bar once an index is found.
pub struct LoadProgress {
    bar: ProgressBar,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for LoadProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl LoadObserver for LoadProgress {
    fn trying(&self, url: &str) {
        if self.bar.is_hidden() {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
            self.bar.set_style(
                style(SPINNER_TEMPLATE).tick_chars("\u{25b8}\u{25b9}\u{25b8}\u{25b9}\u{25b8}"),
            );
            self.bar.enable_steady_tick(Duration::from_millis(120));
        }
        self.bar.set_message(format!("Trying {url}..."));
    }

    fn index_found(&self, children: usize) {
        self.bar.disable_steady_tick();
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_style(style(BAR_TEMPLATE).progress_chars("\u{2588}\u{2591} "));
        self.bar.set_length(children as u64);
        self.bar.set_position(0);
        self.bar
            .set_message(format!("Sitemap index found with {children} sitemaps"));
    }

    fn child_started(&self, _position: usize, url: &str) {
        self.bar.set_message(format!("Fetching {url}..."));
    }

    fn child_finished(&self, _url: &str, _ok: bool) {
        self.bar.inc(1);
    }

    fn index_done(&self, _entries: usize, _failed: usize) {
        self.bar.finish_and_clear();
    }
}
