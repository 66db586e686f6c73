use crate::model::StatusCategory;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

pub type StatusCounts = IndexMap<StatusCategory, usize>;
pub type StatusPercentages = IndexMap<StatusCategory, f64>;

/// Snapshot of one sprint's status figures, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintMetrics {
    pub total: usize,
    /// Every category in table order, `uncategorized` included.
    pub counts: StatusCounts,
    /// Every category except `uncategorized`, one decimal.
    pub percentages: StatusPercentages,
    pub pending_pct: f64,
    pub production_pct: f64,
    pub daily_task_count: f64,
    pub sprint_start: NaiveDate,
    pub sprint_end: NaiveDate,
    pub total_days: u64,
    pub days_left: u64,
}

impl SprintMetrics {
    pub fn count(&self, category: StatusCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn percentage(&self, category: StatusCategory) -> f64 {
        self.percentages.get(&category).copied().unwrap_or(0.0)
    }
}

pub fn empty_counts() -> StatusCounts {
    StatusCategory::ALL
        .iter()
        .map(|category| (*category, 0))
        .collect()
}
