//! Error type for the portfolio report pipeline.

use std::path::PathBuf;

/// Errors that abort a report run.
///
/// Degenerate aggregates (zero weights, empty groups, unmatched joins) are
/// handled numerically by the pipeline and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table {table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Table {table}, row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    Config { field: String, message: String },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
