mod context;
mod issue;
mod result;
mod sprint;
mod status;

pub use context::RunContext;
pub use issue::{parse_date, Issue, IssueType, Row};
pub use result::{Diagnostic, ReportError, Result};
pub use sprint::Sprint;
pub use status::{normalize_status, StatusCategory};
