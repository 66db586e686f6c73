use crate::analyze::{StatusCounts, StatusPercentages};
use crate::model::{Diagnostic, StatusCategory};
use chrono::NaiveDate;
use serde::Serialize;

/// Render-ready report handed to the spreadsheet writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub sprint: SprintBlock,
    pub kpi: KpiBlock,
    pub rows: Vec<ReportRow>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hierarchy,
    ExternalEpic,
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub depth: usize,
    pub section: Section,
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    pub status_category: StatusCategory,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub link: Option<String>,
    pub target_start: Option<NaiveDate>,
    pub target_end: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub latest_comment: Option<String>,
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiBlock {
    pub total: usize,
    pub counts: StatusCounts,
    pub percentages: StatusPercentages,
    pub pending_pct: f64,
    pub production_pct: f64,
    pub daily_task_count: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintBlock {
    pub number: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: u64,
    pub days_left: u64,
    pub dev_release: Option<NaiveDate>,
    pub qa_release: Option<NaiveDate>,
    pub prod_release: Option<NaiveDate>,
    pub scrum_master: Option<String>,
    pub goal: Option<String>,
    pub major_items: Vec<String>,
}
