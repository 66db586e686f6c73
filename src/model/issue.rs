use crate::model::{Diagnostic, ReportError, Result, RunContext, StatusCategory};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{from_str, Value};
use std::fmt;
use std::fs;
use tracing::{debug, info};

/// One exported row, keyed by column header.
pub type Row = IndexMap<String, Value>;

pub const COLUMN_KEY: &str = "Issue key";
pub const COLUMN_TYPE: &str = "Issue Type";
pub const COLUMN_SUMMARY: &str = "Summary";
pub const COLUMN_STATUS: &str = "Status";
pub const COLUMN_PARENT: &str = "Parent key";
pub const COLUMN_PRIORITY: &str = "Priority";
pub const COLUMN_ASSIGNEE: &str = "Assignee";
pub const COLUMN_TARGET_START: &str = "Custom field (Target start)";
pub const COLUMN_TARGET_END: &str = "Custom field (Target end)";
pub const COLUMN_DUE_DATE: &str = "Due date";
const COMMENT_COLUMNS: [&str; 7] = [
    "Comment",
    "Comment.1",
    "Comment.2",
    "Comment.3",
    "Comment.4",
    "Comment.5",
    "Comment.6",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum IssueType {
    Epic,
    Story,
    Task,
    Bug,
    SubTask,
    Other(String),
}

impl IssueType {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "epic" => IssueType::Epic,
            "story" => IssueType::Story,
            "task" => IssueType::Task,
            "bug" => IssueType::Bug,
            "sub-task" | "subtask" => IssueType::SubTask,
            _ => IssueType::Other(label.trim().to_string()),
        }
    }

    pub fn is_epic(&self) -> bool {
        matches!(self, IssueType::Epic)
    }

    pub fn is_sub_task(&self) -> bool {
        matches!(self, IssueType::SubTask)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Epic => f.write_str("Epic"),
            IssueType::Story => f.write_str("Story"),
            IssueType::Task => f.write_str("Task"),
            IssueType::Bug => f.write_str("Bug"),
            IssueType::SubTask => f.write_str("Sub-task"),
            IssueType::Other(label) => f.write_str(label),
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub key: String,
    pub issue_type: IssueType,
    pub summary: String,
    pub status: String,
    pub parent: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub target_start: Option<NaiveDate>,
    pub target_end: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub latest_comment: Option<String>,
    pub link: Option<String>,
}

// Create
impl Issue {
    pub fn new(
        key: impl ToString,
        issue_type: IssueType,
        summary: impl ToString,
        status: impl ToString,
        parent: Option<impl ToString>,
    ) -> Self {
        Self {
            key: key.to_string(),
            issue_type,
            summary: summary.to_string(),
            status: status.to_string().trim().to_string(),
            parent: parent
                .map(|p| p.to_string().trim().to_string())
                .filter(|p| !p.is_empty()),
            priority: None,
            assignee: None,
            target_start: None,
            target_end: None,
            due_date: None,
            latest_comment: None,
            link: None,
        }
    }

    /// Reads an exported issue file and normalizes every row.
    ///
    /// Rows missing a key or type are reported on `ctx` and skipped.
    pub fn from_export(path: &str, ctx: &mut RunContext) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_string(),
            source,
        })?;
        let rows: Vec<Row> = from_str(&json_str).map_err(|source| ReportError::Json {
            path: path.to_string(),
            source,
        })?;
        info!("Read {} rows from `{}`", rows.len(), path);
        Ok(Self::normalize_rows(&rows, ctx))
    }

    pub fn normalize_rows(rows: &[Row], ctx: &mut RunContext) -> Vec<Self> {
        let mut result = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match Self::from_row(row, index + 1, ctx.browse_url.as_deref()) {
                Ok(issue) => result.push(issue),
                Err(diagnostic) => ctx.report(diagnostic),
            }
        }
        result
    }

    pub fn status_category(&self) -> StatusCategory {
        StatusCategory::from_status(&self.status)
    }
}

// Parser
impl Issue {
    pub fn from_row(
        row: &Row,
        row_number: usize,
        browse_url: Option<&str>,
    ) -> std::result::Result<Self, Diagnostic> {
        let missing = |column: &str| Diagnostic::MalformedRecord {
            row: row_number,
            column: column.to_string(),
        };
        let Some(key) = text(row, COLUMN_KEY) else {
            return Err(missing(COLUMN_KEY));
        };
        let Some(issue_type) = text(row, COLUMN_TYPE) else {
            return Err(missing(COLUMN_TYPE));
        };

        let mut issue = Self::new(
            &key,
            IssueType::parse(&issue_type),
            text(row, COLUMN_SUMMARY).unwrap_or_default(),
            text(row, COLUMN_STATUS).unwrap_or_default(),
            text(row, COLUMN_PARENT),
        );
        issue.priority = text(row, COLUMN_PRIORITY);
        issue.assignee = text(row, COLUMN_ASSIGNEE);
        issue.target_start = date(row, COLUMN_TARGET_START);
        issue.target_end = date(row, COLUMN_TARGET_END);
        issue.due_date = date(row, COLUMN_DUE_DATE);
        issue.latest_comment = latest_comment(row);
        issue.link = browse_url.map(|base| format!("{base}/{key}"));
        Ok(issue)
    }
}

fn text(row: &Row, column: &str) -> Option<String> {
    let value = match row.get(column)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(value).filter(|v| !v.is_empty())
}

fn date(row: &Row, column: &str) -> Option<NaiveDate> {
    let raw = text(row, column)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        debug!("Ignoring unparseable date `{}` in column '{}'", raw, column);
    }
    parsed
}

/// Accepts ISO dates, RFC 3339 timestamps and the tracker's `02/Feb/26 9:30 AM` form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    ["%d/%b/%y %I:%M %p", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%d/%b/%y").ok())
}

fn latest_comment(row: &Row) -> Option<String> {
    let latest = COMMENT_COLUMNS
        .iter()
        .filter_map(|column| text(row, column))
        .last()?;
    let parts = latest.splitn(3, ';').collect::<Vec<_>>();
    match parts.as_slice() {
        [_, _, body] => Some(body.trim().to_string()).filter(|b| !b.is_empty()),
        _ => Some(latest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_full_row() {
        let row = row(json!({
            "Issue key": "PB-2",
            "Issue Type": "Story",
            "Summary": "  Login page ",
            "Status": " Done ",
            "Parent key": "PB-1",
            "Priority": "High",
            "Assignee": "Dana",
            "Custom field (Target start)": "2026-02-02",
            "Custom field (Target end)": "05/Feb/26 12:00 AM",
        }));
        let issue = Issue::from_row(&row, 1, Some("https://tracker.test/browse")).unwrap();
        assert_eq!(issue.key, "PB-2");
        assert_eq!(issue.issue_type, IssueType::Story);
        assert_eq!(issue.summary, "Login page");
        assert_eq!(issue.status, "Done");
        assert_eq!(issue.parent.as_deref(), Some("PB-1"));
        assert_eq!(issue.priority.as_deref(), Some("High"));
        assert_eq!(issue.target_start, NaiveDate::from_ymd_opt(2026, 2, 2));
        assert_eq!(issue.target_end, NaiveDate::from_ymd_opt(2026, 2, 5));
        assert_eq!(issue.link.as_deref(), Some("https://tracker.test/browse/PB-2"));
        assert_eq!(issue.status_category(), StatusCategory::Production);
    }

    #[test]
    fn missing_key_or_type_is_malformed() {
        let no_key = row(json!({ "Issue Type": "Task", "Summary": "x" }));
        assert_eq!(
            Issue::from_row(&no_key, 3, None),
            Err(Diagnostic::MalformedRecord {
                row: 3,
                column: COLUMN_KEY.to_string()
            })
        );

        let blank_type = row(json!({ "Issue key": "PB-1", "Issue Type": "  " }));
        assert_eq!(
            Issue::from_row(&blank_type, 4, None),
            Err(Diagnostic::MalformedRecord {
                row: 4,
                column: COLUMN_TYPE.to_string()
            })
        );
    }

    #[test]
    fn unknown_type_becomes_other() {
        let row = row(json!({ "Issue key": "PB-7", "Issue Type": "Initiative", "Parent key": null }));
        let issue = Issue::from_row(&row, 1, None).unwrap();
        assert_eq!(issue.issue_type, IssueType::Other("Initiative".to_string()));
        assert_eq!(issue.parent, None);
        assert_eq!(issue.status_category(), StatusCategory::Uncategorized);
    }

    #[test]
    fn sub_task_labels_are_recognized() {
        assert_eq!(IssueType::parse("Sub-task"), IssueType::SubTask);
        assert_eq!(IssueType::parse("subtask"), IssueType::SubTask);
        assert_eq!(IssueType::parse("EPIC"), IssueType::Epic);
    }

    #[test]
    fn bad_dates_are_dropped_not_rejected() {
        let row = row(json!({
            "Issue key": "PB-3",
            "Issue Type": "Task",
            "Custom field (Target start)": "someday",
            "Due date": "2026-03-01T10:00:00+05:30",
        }));
        let issue = Issue::from_row(&row, 1, None).unwrap();
        assert_eq!(issue.target_start, None);
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn keeps_text_of_latest_comment() {
        let row = row(json!({
            "Issue key": "PB-4",
            "Issue Type": "Bug",
            "Comment": "01/Feb/26 10:00 AM ; abc ; first",
            "Comment.1": "03/Feb/26 11:00 AM ; def ; fixed; needs QA",
            "Comment.2": "",
        }));
        let issue = Issue::from_row(&row, 1, None).unwrap();
        assert_eq!(issue.latest_comment.as_deref(), Some("fixed; needs QA"));
    }

    #[test]
    fn numeric_keys_are_accepted() {
        let row = row(json!({ "Issue key": 42, "Issue Type": "Task" }));
        let issue = Issue::from_row(&row, 1, None).unwrap();
        assert_eq!(issue.key, "42");
    }

    #[test]
    fn normalize_rows_collects_failures() {
        let rows = vec![
            row(json!({ "Issue key": "PB-1", "Issue Type": "Epic" })),
            row(json!({ "Summary": "orphan row" })),
            row(json!({ "Issue key": "PB-2", "Issue Type": "Task" })),
        ];
        let mut ctx = RunContext::new(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        let issues = Issue::normalize_rows(&rows, &mut ctx);
        assert_eq!(issues.len(), 2);
        assert_eq!(ctx.diagnostics().len(), 1);
    }
}
