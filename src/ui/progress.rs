use super::style::is_quiet;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner ticking once per loaded record. Hidden when stdout is not a
/// terminal or output is quiet.
pub struct RecordSpinner {
    pb: ProgressBar,
}

impl RecordSpinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() && !is_quiet() {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{pos} records, {elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        Self { pb }
    }

    pub fn record_loaded(&self, name: &str) {
        self.pb.inc(1);
        self.pb.set_message(format!("Loading {}", name));
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
