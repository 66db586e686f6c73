use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;

    /// Adds a spinner line for one pipeline stage.
    fn add_stage(&self, message: impl Into<String>) -> ProgressBar {
        let pb = self.add_with_style(ProgressBar::new_spinner(), ProgressStyleTemplate::stage());
        pb.set_message(message.into());
        pb
    }
}

impl MultiProgressNew for MultiProgress {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

pub fn finish_stage(pb: &ProgressBar, message: impl Into<String>) {
    pb.set_style(ProgressStyleTemplate::stage_done());
    pb.finish_with_message(format!("✅ {}", message.into()));
}
