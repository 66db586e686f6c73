use crate::model::{ReportError, Result, StatusCategory};
use crate::report::model::{ReportModel, ReportRow, Section, SprintBlock};
use chrono::NaiveDate;
use itertools::Itertools;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;

const DATE_FORMAT: &str = "%d %b %Y";

/// Plain Markdown preview of a report model. Colours and cell styles are left
/// to the spreadsheet writer.
pub trait MarkdownReport {
    fn render_markdown(&self) -> Result<String>;

    fn report_create(&self, path: &str) -> Result<()> {
        let doc = self.render_markdown()?;
        fs::write(path, doc).map_err(|source| ReportError::Io {
            path: path.to_string(),
            source,
        })
    }
}

impl MarkdownReport for ReportModel {
    fn render_markdown(&self) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1(format!("Sprint {} Report", self.sprint.number));
        doc.add_sprint(&self.sprint)?;
        doc.add_kpis(self)?;
        doc.add_issues(&self.rows)?;
        if !self.diagnostics.is_empty() {
            doc.header2("Data quality");
            let notes = self
                .diagnostics
                .iter()
                .map(|diagnostic| format!("- {diagnostic}"))
                .join("\n");
            doc.paragraph(notes);
        }

        Ok(doc.render())
    }
}

trait MarkdownExt {
    fn add_sprint(&mut self, sprint: &SprintBlock) -> Result<()>;
    fn add_kpis(&mut self, model: &ReportModel) -> Result<()>;
    fn add_issues(&mut self, rows: &[ReportRow]) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_sprint(&mut self, sprint: &SprintBlock) -> Result<()> {
        self.header2(format!(
            "Sprint #{} ({} - {})",
            sprint.number,
            sprint.start.format(DATE_FORMAT),
            sprint.end.format(DATE_FORMAT),
        ));

        let header = [
            "Sprint Number",
            "Sprint Start Date",
            "Sprint Development Release",
            "Sprint QA Release",
            "Production Release",
            "Sprint End Date",
            "Total No. of Days",
            "Scrum Master",
        ];
        let row = vec![
            sprint.number.to_string(),
            format_day(Some(sprint.start)),
            format_day(sprint.dev_release),
            format_day(sprint.qa_release),
            format_day(sprint.prod_release),
            format_day(Some(sprint.end)),
            sprint.total_days.to_string(),
            sprint.scrum_master.clone().unwrap_or_else(|| "-".to_string()),
        ];
        self.paragraph(table(&header, vec![row])?);

        if let Some(goal) = &sprint.goal {
            self.paragraph(format!("**Sprint Goal:** {}", escape(goal)));
        }
        if !sprint.major_items.is_empty() {
            let items = sprint
                .major_items
                .iter()
                .map(|item| format!("- {}", escape(item)))
                .join("\n");
            self.paragraph(format!("**Major Sprint Items**\n\n{items}"));
        }
        Ok(())
    }

    fn add_kpis(&mut self, model: &ReportModel) -> Result<()> {
        self.header2("Summary");

        let header = [
            "No of Days Left in Sprint",
            "Action Items",
            "Pending %",
            "Production Release %",
            "Daily Task Count",
        ];
        let row = vec![
            model.sprint.days_left.to_string(),
            model.kpi.total.to_string(),
            format!("{:.1}%", model.kpi.pending_pct),
            format!("{:.1}%", model.kpi.production_pct),
            format!("{}", model.kpi.daily_task_count),
        ];
        self.paragraph(table(&header, vec![row])?);

        let header = StatusCategory::ALL
            .iter()
            .map(StatusCategory::label)
            .collect::<Vec<_>>();
        let counts = StatusCategory::ALL
            .iter()
            .map(|category| {
                let count = model.kpi.counts.get(category).copied().unwrap_or(0);
                match model.kpi.percentages.get(category) {
                    Some(pct) => format!("{count} ({pct:.1}%)"),
                    None => count.to_string(),
                }
            })
            .collect::<Vec<_>>();
        self.paragraph(table(&header, vec![counts])?);
        Ok(())
    }

    fn add_issues(&mut self, rows: &[ReportRow]) -> Result<()> {
        self.header2("Issues");
        if rows.is_empty() {
            self.paragraph("*No issues in this export.*".to_string());
            return Ok(());
        }

        let header = [
            "Issue Key",
            "Issue Type",
            "Summary / Title",
            "Status",
            "Priority",
            "Assignee",
            "Projected Start",
            "Projected End",
        ];
        for (section, rows) in &rows.iter().chunk_by(|row| row.section) {
            self.paragraph(format!("**{}**", section_title(section)));
            let body = rows
                .map(|row| {
                    vec![
                        issue_key(row),
                        row.issue_type.clone(),
                        indented_summary(row),
                        escape(&row.status),
                        row.priority.clone().unwrap_or_default(),
                        row.assignee.clone().unwrap_or_else(|| "Unassigned".to_string()),
                        format_day(row.target_start),
                        format_day(row.target_end),
                    ]
                })
                .collect::<Vec<_>>();
            self.paragraph(table(&header, body)?);
        }
        Ok(())
    }
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> Result<String> {
    let headings = header
        .iter()
        .map(|title| Heading::new(title.to_string(), Some(HeadingAlignment::Left)))
        .collect::<Vec<_>>();
    let mut md_table = MarkdownTable::new(rows);
    md_table.with_headings(headings);
    md_table
        .as_markdown()
        .map_err(|err| ReportError::Render(format!("{err:?}")))
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::Hierarchy => "Epics",
        Section::ExternalEpic => "External Epics",
        Section::Standalone => "Unlinked / Standalone Items",
    }
}

fn issue_key(row: &ReportRow) -> String {
    match &row.link {
        Some(link) => format!("[{}]({link})", row.key),
        None => row.key.clone(),
    }
}

fn indented_summary(row: &ReportRow) -> String {
    let marker = match row.depth {
        0 => "■",
        1 => "▶",
        _ => "◦",
    };
    let indent = "&nbsp;&nbsp;&nbsp;&nbsp;".repeat(row.depth);
    let summary = if row.synthetic {
        format!("[EXTERNAL EPIC] {}", row.summary)
    } else {
        row.summary.clone()
    };
    format!("{indent}{marker} {}", escape(&summary))
}

fn format_day(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
