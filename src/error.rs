//! Error types for metrics-report

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the input dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file missing or unreadable
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row lacks a required column
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// A cell that does not parse into the value its column requires
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed value {value:?} in column '{column}' at row {row}")]
pub struct MalformedValueError {
    pub column: String,
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub value: String,
}

/// Failure while drawing or writing a chart
#[derive(Error, Debug)]
pub enum RenderError {
    /// Drawing backend or PNG encoder failure
    #[error("failed to render {file}: {message}")]
    Drawing { file: String, message: String },

    /// Output directory could not be created
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing to draw
    #[error("cannot render {file}: dataset is empty")]
    EmptyDataset { file: String },
}

impl RenderError {
    pub(crate) fn drawing(file: &str, err: impl std::fmt::Display) -> Self {
        Self::Drawing {
            file: file.to_string(),
            message: err.to_string(),
        }
    }
}

/// Failure while exporting the summary tables
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of the report pipeline
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    MalformedValue(#[from] MalformedValueError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ReportError>;
