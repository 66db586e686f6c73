use crate::analyze::model::{empty_counts, StatusCounts, StatusPercentages};
use crate::analyze::SprintMetrics;
use crate::model::{Issue, Sprint, StatusCategory};
use chrono::NaiveDate;
use tracing::debug;

pub trait Analyzer {
    fn analyze_sprint(&self, sprint: &Sprint, today: NaiveDate) -> SprintMetrics;
}

impl Analyzer for [Issue] {
    fn analyze_sprint(&self, sprint: &Sprint, today: NaiveDate) -> SprintMetrics {
        let counts = count_statuses(self);
        let total = self.len();
        let percentages = counts
            .iter()
            .filter(|(category, _)| **category != StatusCategory::Uncategorized)
            .map(|(category, count)| (*category, percent(*count, total)))
            .collect::<StatusPercentages>();

        let metrics = SprintMetrics {
            total,
            pending_pct: percentages
                .get(&StatusCategory::Pending)
                .copied()
                .unwrap_or(0.0),
            production_pct: percentages
                .get(&StatusCategory::Production)
                .copied()
                .unwrap_or(0.0),
            counts,
            percentages,
            daily_task_count: daily_task_count(total, sprint.total_days),
            sprint_start: sprint.start,
            sprint_end: sprint.end(),
            total_days: sprint.total_days,
            days_left: sprint.days_left(today),
        };
        debug!(
            "Sprint #{}: {} issues, {}% pending, {}% in production",
            sprint.number, metrics.total, metrics.pending_pct, metrics.production_pct
        );
        metrics
    }
}

fn count_statuses(issues: &[Issue]) -> StatusCounts {
    issues.iter().fold(empty_counts(), |mut acc, issue| {
        *acc.entry(issue.status_category()).or_insert(0) += 1;
        acc
    })
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

fn daily_task_count(total: usize, total_days: u64) -> f64 {
    if total_days == 0 {
        return 0.0;
    }
    (total as f64 * 100.0 / total_days as f64).round() / 100.0
}
