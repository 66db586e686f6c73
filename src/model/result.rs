use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures of the shell around the core: reading inputs and writing outputs.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid sprint config: {0}")]
    Config(String),

    #[error("failed to render report: {0}")]
    Render(String),
}

/// Non-fatal conditions recorded during one run. None of them stops the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("row {row}: missing required column '{column}'")]
    MalformedRecord { row: usize, column: String },

    #[error("duplicate issue key '{key}' at position {position}, first occurrence kept")]
    DuplicateIdentifier { key: String, position: usize },

    #[error("issue '{key}' references unknown parent '{parent}'")]
    UnresolvedParentReference { key: String, parent: String },

    #[error("issue '{key}' closes a parent cycle through '{parent}', moved to standalone items")]
    CycleBroken { key: String, parent: String },

    #[error("input contains no issues")]
    EmptyInputSet,
}
