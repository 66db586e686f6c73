use crate::analyze::SprintMetrics;
use crate::hierarchy::{ExternalEpic, Hierarchy, HierarchyNode};
use crate::model::{Issue, IssueType, RunContext, Sprint, StatusCategory};
use crate::report::model::{KpiBlock, ReportModel, ReportRow, Section, SprintBlock};
use tracing::debug;

/// Flattens a resolved hierarchy into ordered rows and attaches the KPI and sprint blocks.
///
/// Consumes the run context: its diagnostics travel with the model.
pub fn build_report(
    hierarchy: &Hierarchy,
    metrics: &SprintMetrics,
    sprint: &Sprint,
    ctx: RunContext,
) -> ReportModel {
    let mut rows = Vec::with_capacity(hierarchy.issue_count() + hierarchy.external_epics.len());
    for tree in &hierarchy.trees {
        push_subtree(&mut rows, tree, 0, Section::Hierarchy);
    }
    for epic in hierarchy.external_epics.values() {
        rows.push(placeholder_row(epic, ctx.browse_url.as_deref()));
        for child in &epic.children {
            push_subtree(&mut rows, child, 1, Section::ExternalEpic);
        }
    }
    for node in &hierarchy.standalone {
        push_subtree(&mut rows, node, 0, Section::Standalone);
    }
    debug!("Built report model with {} rows", rows.len());

    ReportModel {
        sprint: sprint_block(sprint, metrics),
        kpi: KpiBlock {
            total: metrics.total,
            counts: metrics.counts.clone(),
            percentages: metrics.percentages.clone(),
            pending_pct: metrics.pending_pct,
            production_pct: metrics.production_pct,
            daily_task_count: metrics.daily_task_count,
        },
        rows,
        diagnostics: ctx.into_diagnostics(),
    }
}

fn push_subtree(rows: &mut Vec<ReportRow>, node: &HierarchyNode, base: usize, section: Section) {
    rows.extend(
        node.walk()
            .map(|(depth, node)| issue_row(&node.issue, base + depth, section)),
    );
}

fn issue_row(issue: &Issue, depth: usize, section: Section) -> ReportRow {
    ReportRow {
        depth,
        section,
        key: issue.key.clone(),
        issue_type: issue.issue_type.to_string(),
        summary: issue.summary.clone(),
        status: issue.status.clone(),
        status_category: issue.status_category(),
        priority: issue.priority.clone(),
        assignee: issue.assignee.clone(),
        link: issue.link.clone(),
        target_start: issue.target_start,
        target_end: issue.target_end,
        due_date: issue.due_date,
        latest_comment: issue.latest_comment.clone(),
        synthetic: false,
    }
}

fn placeholder_row(epic: &ExternalEpic, browse_url: Option<&str>) -> ReportRow {
    ReportRow {
        depth: 0,
        section: Section::ExternalEpic,
        key: epic.key.clone(),
        issue_type: IssueType::Epic.to_string(),
        summary: epic.key.clone(),
        status: String::new(),
        status_category: StatusCategory::Uncategorized,
        priority: None,
        assignee: None,
        link: browse_url.map(|base| format!("{base}/{}", epic.key)),
        target_start: None,
        target_end: None,
        due_date: None,
        latest_comment: None,
        synthetic: epic.is_synthetic(),
    }
}

fn sprint_block(sprint: &Sprint, metrics: &SprintMetrics) -> SprintBlock {
    SprintBlock {
        number: sprint.number,
        start: metrics.sprint_start,
        end: metrics.sprint_end,
        total_days: metrics.total_days,
        days_left: metrics.days_left,
        dev_release: sprint.dev_release,
        qa_release: sprint.qa_release,
        prod_release: sprint.prod_release,
        scrum_master: sprint.scrum_master.clone(),
        goal: sprint.goal.clone(),
        major_items: sprint.major_items.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::hierarchy::resolve;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn build(issues: &[Issue]) -> ReportModel {
        let sprint = Sprint::new(27, day(2026, 2, 2), 21);
        let mut ctx = RunContext::new(day(2026, 2, 10)).with_browse_url(Some("https://t.test/browse/"));
        let hierarchy = resolve(issues, &mut ctx);
        let metrics = issues.analyze_sprint(&sprint, ctx.today);
        build_report(&hierarchy, &metrics, &sprint, ctx)
    }

    #[test]
    fn flattens_in_resolver_order() {
        let issues = vec![
            Issue::new("SOLO", IssueType::Task, "loose", "Blocked", None::<&str>),
            Issue::new("PB-1", IssueType::Epic, "Epic A", "In Progress", None::<&str>),
            Issue::new("PB-2", IssueType::Story, "S1", "Done", Some("PB-1")),
            Issue::new("PB-3", IssueType::Task, "T1", "Open", Some("PB-99")),
            Issue::new("PB-4", IssueType::SubTask, "ST", "Open", Some("PB-2")),
            Issue::new("PB-5", IssueType::SubTask, "ST2", "Open", Some("PB-3")),
        ];
        let model = build(&issues);

        let layout = model
            .rows
            .iter()
            .map(|row| (row.key.as_str(), row.depth, row.section, row.synthetic))
            .collect::<Vec<_>>();
        assert_eq!(
            layout,
            vec![
                ("PB-1", 0, Section::Hierarchy, false),
                ("PB-2", 1, Section::Hierarchy, false),
                ("PB-4", 2, Section::Hierarchy, false),
                ("PB-99", 0, Section::ExternalEpic, true),
                ("PB-3", 1, Section::ExternalEpic, false),
                ("PB-5", 2, Section::ExternalEpic, false),
                ("SOLO", 0, Section::Standalone, false),
            ]
        );
        assert_eq!(model.kpi.total, 6);
        assert_eq!(model.rows[3].link.as_deref(), Some("https://t.test/browse/PB-99"));
        assert_eq!(model.rows[1].status_category, StatusCategory::Production);
    }

    #[test]
    fn rows_match_issue_count_plus_placeholders() {
        let issues = vec![
            Issue::new("A", IssueType::Story, "a", "Open", Some("X")),
            Issue::new("B", IssueType::Story, "b", "Open", Some("Y")),
            Issue::new("C", IssueType::Story, "c", "Open", Some("X")),
        ];
        let model = build(&issues);
        let real = model.rows.iter().filter(|row| !row.synthetic).count();
        let synthetic = model.rows.iter().filter(|row| row.synthetic).count();

        assert_eq!(real, 3);
        assert_eq!(synthetic, 2);
    }

    #[test]
    fn empty_input_gives_empty_rows() {
        let model = build(&[]);
        assert!(model.rows.is_empty());
        assert_eq!(model.kpi.total, 0);
        assert_eq!(model.sprint.end, day(2026, 2, 22));
        assert_eq!(model.sprint.days_left, 13);
    }
}
