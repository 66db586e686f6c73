use crate::model::{ReportError, Result};
use crate::report::ReportModel;
use std::fs;

/// Hands the report model to the spreadsheet writer as pretty-printed JSON.
pub trait JsonReport {
    fn to_json(&self) -> Result<String>;

    fn write_json(&self, path: &str) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_string(),
            source,
        })
    }
}

impl JsonReport for ReportModel {
    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| ReportError::Render(err.to_string()))
    }
}
