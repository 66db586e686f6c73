use crate::model::{ReportError, Result};
use chrono::{Days, NaiveDate};
use serde_json::{from_str, Value};
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
    pub number: u64,
    pub start: NaiveDate,
    pub total_days: u64,
    pub dev_release: Option<NaiveDate>,
    pub qa_release: Option<NaiveDate>,
    pub prod_release: Option<NaiveDate>,
    pub scrum_master: Option<String>,
    pub goal: Option<String>,
    pub major_items: Vec<String>,
    pub browse_url: Option<String>,
}

// Create
impl Sprint {
    pub fn from_config(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&json_str)
    }

    pub fn new(number: u64, start: NaiveDate, total_days: u64) -> Self {
        Self {
            number,
            start,
            total_days,
            dev_release: None,
            qa_release: None,
            prod_release: None,
            scrum_master: None,
            goal: None,
            major_items: Vec::new(),
            browse_url: None,
        }
    }

    /// Last sprint day, counting the start day as day one.
    pub fn end(&self) -> NaiveDate {
        let offset = self.total_days.saturating_sub(1);
        self.start
            .checked_add_days(Days::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Days left including `today`, floored at zero once the sprint is over.
    pub fn days_left(&self, today: NaiveDate) -> u64 {
        let remaining = (self.end() - today).num_days() + 1;
        remaining.max(0) as u64
    }
}

// Parser
impl Sprint {
    fn parse(json_str: &str) -> Result<Self> {
        let details: Value =
            from_str(json_str).map_err(|err| ReportError::Config(err.to_string()))?;
        let Some(number) = details["number"].as_u64() else {
            return Err(ReportError::Config("Not found 'number' field".into()));
        };
        let Some(start) = details["start"].as_str() else {
            return Err(ReportError::Config("Not found 'start' field".into()));
        };
        let start = parse_day(start)?;
        let total_days = match (details["totalDays"].as_u64(), details["end"].as_str()) {
            (Some(total_days), _) => total_days,
            (None, Some(end)) => {
                let end = parse_day(end)?;
                if end < start {
                    return Err(ReportError::Config(format!(
                        "Sprint end {end} is before start {start}"
                    )));
                }
                (end - start).num_days() as u64 + 1
            }
            (None, None) => {
                return Err(ReportError::Config(
                    "Not found 'totalDays' or 'end' field".into(),
                ))
            }
        };

        let mut sprint = Self::new(number, start, total_days);
        sprint.dev_release = optional_day(&details, "devRelease")?;
        sprint.qa_release = optional_day(&details, "qaRelease")?;
        sprint.prod_release = optional_day(&details, "prodRelease")?;
        check_order(Some(start), sprint.dev_release, "Dev release", "sprint start")?;
        check_order(sprint.dev_release, sprint.qa_release, "QA release", "dev release")?;
        check_order(sprint.qa_release, sprint.prod_release, "Production release", "QA release")?;
        sprint.scrum_master = optional_text(&details, "scrumMaster");
        sprint.goal = optional_text(&details, "goal");
        sprint.browse_url = optional_text(&details, "browseUrl");
        sprint.major_items = match details["majorItems"].as_array() {
            Some(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
            None => Vec::new(),
        };
        Ok(sprint)
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReportError::Config(format!("Not a valid date: {raw}")))
}

fn optional_day(details: &Value, field: &str) -> Result<Option<NaiveDate>> {
    details[field].as_str().map(parse_day).transpose()
}

/// Fails when both dates are set and `later` falls before `earlier`.
fn check_order(
    earlier: Option<NaiveDate>,
    later: Option<NaiveDate>,
    later_name: &str,
    earlier_name: &str,
) -> Result<()> {
    match (earlier, later) {
        (Some(earlier), Some(later)) if later < earlier => Err(ReportError::Config(format!(
            "{later_name} {later} is before {earlier_name} {earlier}"
        ))),
        _ => Ok(()),
    }
}

fn optional_text(details: &Value, field: &str) -> Option<String> {
    details[field]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_counts_start_day() {
        let sprint = Sprint::new(27, day(2026, 2, 2), 21);
        assert_eq!(sprint.end(), day(2026, 2, 22));
        assert_eq!(Sprint::new(1, day(2026, 2, 2), 0).end(), day(2026, 2, 2));
    }

    #[test]
    fn days_left_is_inclusive_and_floored() {
        let sprint = Sprint::new(27, day(2026, 2, 2), 21);
        assert_eq!(sprint.days_left(day(2026, 2, 2)), 21);
        assert_eq!(sprint.days_left(day(2026, 2, 22)), 1);
        assert_eq!(sprint.days_left(day(2026, 2, 23)), 0);
        assert_eq!(sprint.days_left(day(2026, 6, 1)), 0);
    }

    #[test]
    fn parses_config_with_end_date() {
        let sprint = Sprint::parse(
            r#"{
                "number": 27,
                "start": "2026-02-02",
                "end": "2026-02-22",
                "qaRelease": "2026-02-20",
                "scrumMaster": " Priya ",
                "majorItems": ["Rule engine", "Exports"]
            }"#,
        )
        .unwrap();
        assert_eq!(sprint.total_days, 21);
        assert_eq!(sprint.qa_release, Some(day(2026, 2, 20)));
        assert_eq!(sprint.scrum_master.as_deref(), Some("Priya"));
        assert_eq!(sprint.major_items.len(), 2);
    }

    #[test]
    fn total_days_wins_over_end() {
        let sprint =
            Sprint::parse(r#"{"number": 3, "start": "2026-01-05", "totalDays": 10, "end": "2026-03-01"}"#)
                .unwrap();
        assert_eq!(sprint.total_days, 10);
    }

    #[test]
    fn rejects_incomplete_config() {
        assert!(Sprint::parse(r#"{"start": "2026-01-05", "totalDays": 10}"#).is_err());
        assert!(Sprint::parse(r#"{"number": 1, "start": "2026-01-05"}"#).is_err());
        assert!(Sprint::parse(r#"{"number": 1, "start": "05.01.2026", "totalDays": 3}"#).is_err());
        assert!(Sprint::parse(
            r#"{"number": 1, "start": "2026-01-05", "end": "2026-01-01"}"#
        )
        .is_err());
    }

    #[test]
    fn rejects_release_dates_out_of_order() {
        let config = |releases: &str| {
            format!(r#"{{"number": 4, "start": "2026-03-02", "totalDays": 14{releases}}}"#)
        };

        let err = Sprint::parse(&config(r#", "devRelease": "2026-03-01""#)).unwrap_err();
        assert!(err.to_string().contains("Dev release"));
        let err = Sprint::parse(&config(
            r#", "devRelease": "2026-03-09", "qaRelease": "2026-03-06""#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("QA release"));
        let err = Sprint::parse(&config(
            r#", "qaRelease": "2026-03-12", "prodRelease": "2026-03-11""#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("Production release"));

        let sprint = Sprint::parse(&config(
            r#", "devRelease": "2026-03-09", "qaRelease": "2026-03-09", "prodRelease": "2026-03-13""#,
        ))
        .unwrap();
        assert_eq!(sprint.qa_release, Some(day(2026, 3, 9)));
        // An unset release date does not constrain its neighbours.
        assert!(Sprint::parse(&config(r#", "prodRelease": "2026-03-03""#)).is_ok());
    }
}
