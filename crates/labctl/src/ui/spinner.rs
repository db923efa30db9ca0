use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn default_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Simple RAII spinner on stderr for wrapping a blocking engine call
pub struct PlainSpinner {
    pb: ProgressBar,
}

impl PlainSpinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(80));
        pb.set_style(default_style());
        pb.set_message(style(message).yellow().to_string());
        Self { pb }
    }
}

impl Drop for PlainSpinner {
    fn drop(&mut self) {
        // result lines are printed by the caller once the spinner is gone
        self.pb.finish_and_clear();
    }
}
