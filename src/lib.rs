//! metrics-report - charts for per-request processing metrics
//!
//! Reads a CSV of measured operations (JWT validation, database query and
//! blockchain validation times plus gas used) and renders a fixed gallery of
//! twelve PNG charts.
//!
//! # Architecture
//!
//! - **Dataset**: CSV loading and value normalization
//! - **Aggregate**: Grouped means and sums, correlation, distributions
//! - **Report**: Chart definitions and the generator that renders them
//! - **Visualization**: plotters drawing routines per chart kind
//! - **Output**: Optional summary export (CSV, JSON)
//!
//! # Example
//!
//! ```rust,no_run
//! use metrics_report::{Dataset, RenderSettings, ReportGenerator};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let dataset = Dataset::load(Path::new("metrics.csv"))?;
//!     let mut generator = ReportGenerator::new(dataset, "graphs", RenderSettings::default());
//!     let written = generator.run()?;
//!     println!("{} charts written", written.len());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod report;
pub mod visualization;

// Re-export commonly used types
pub use aggregate::{summarize, OperationSummary};
pub use config::{ConfigError, ReportConfig};
pub use dataset::{Column, Dataset, Record};
pub use error::{ExportError, LoadError, MalformedValueError, RenderError, ReportError};
pub use output::{CsvExporter, JsonExporter};
pub use report::{RenderSettings, ReportDefinition, ReportGenerator, REPORTS};
