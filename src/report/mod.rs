mod builder;
mod json;
mod markdown;
mod model;

pub use builder::build_report;
pub use json::JsonReport;
pub use markdown::MarkdownReport;
pub use model::{KpiBlock, ReportModel, ReportRow, Section, SprintBlock};
