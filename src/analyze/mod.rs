mod analyzer;
mod model;

pub use analyzer::Analyzer;
pub use model::{SprintMetrics, StatusCounts, StatusPercentages};
