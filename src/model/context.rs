use crate::model::Diagnostic;
use chrono::NaiveDate;
use tracing::warn;

/// State owned by a single report-generation run.
///
/// Created by the caller, threaded through every stage and dropped with the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub today: NaiveDate,
    pub browse_url: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl RunContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            browse_url: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_browse_url(mut self, browse_url: Option<impl ToString>) -> Self {
        self.browse_url = browse_url
            .map(|url| url.to_string().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        self
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_diagnostics_in_reporting_order() {
        let mut ctx = RunContext::new(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        ctx.report(Diagnostic::UnresolvedParentReference {
            key: "PB-3".into(),
            parent: "PB-99".into(),
        });
        ctx.report(Diagnostic::EmptyInputSet);

        assert_eq!(ctx.diagnostics().len(), 2);
        assert_eq!(ctx.into_diagnostics()[1], Diagnostic::EmptyInputSet);
    }

    #[test]
    fn browse_url_is_trimmed() {
        let ctx = RunContext::new(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap())
            .with_browse_url(Some("https://tracker.test/browse/"));
        assert_eq!(ctx.browse_url.as_deref(), Some("https://tracker.test/browse"));
    }
}
