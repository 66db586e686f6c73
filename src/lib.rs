//! Sprint report core: rebuilds the epic hierarchy from a flat issue export,
//! computes sprint status metrics and produces a render-ready report model.
//!
//! Data flows one way: rows are normalized into [`model::Issue`]s, linked by
//! [`hierarchy::resolve`], measured by [`analyze::Analyzer`] and flattened by
//! [`report::build_report`].

pub mod analyze;
pub mod hierarchy;
pub mod model;
pub mod report;
pub mod utils;

use crate::analyze::Analyzer;
use crate::model::{Diagnostic, Issue, Row, RunContext, Sprint};
use crate::report::ReportModel;

/// Runs the whole pipeline over raw rows. Rejected rows end up in the model's diagnostics.
pub fn generate(rows: &[Row], sprint: &Sprint, mut ctx: RunContext) -> ReportModel {
    let issues = Issue::normalize_rows(rows, &mut ctx);
    generate_from_issues(&issues, sprint, ctx)
}

pub fn generate_from_issues(issues: &[Issue], sprint: &Sprint, mut ctx: RunContext) -> ReportModel {
    if issues.is_empty() {
        ctx.report(Diagnostic::EmptyInputSet);
    }
    let hierarchy = hierarchy::resolve(issues, &mut ctx);
    let metrics = issues.analyze_sprint(sprint, ctx.today);
    report::build_report(&hierarchy, &metrics, sprint, ctx)
}
