mod multi_progress;
mod progress_style;

pub use multi_progress::{finish_stage, MultiProgressNew};
pub use progress_style::ProgressStyleTemplate;
