//! Report configuration types

use crate::report::RenderSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest accepted resolution
pub const MAX_DPI: u32 = 1200;

/// Report configuration
///
/// Where the metrics come from, where the charts go and how large they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Metrics CSV to read
    pub input: PathBuf,

    /// Directory receiving the charts
    pub output_dir: PathBuf,

    /// Pixels per inch of figure size
    pub dpi: u32,

    /// Also write `summary.csv` and `summary.json`
    #[serde(default)]
    pub summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("metrics.csv"),
            output_dir: PathBuf::from("graphs"),
            dpi: RenderSettings::default().dpi,
            summary: false,
        }
    }
}

impl ReportConfig {
    /// Create a new config reading from `input`
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the resolution
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Enable the summary export
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings { dpi: self.dpi }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dpi == 0 {
            return Err(ConfigError::InvalidDpi("dpi must be at least 1".into()));
        }

        if self.dpi > MAX_DPI {
            return Err(ConfigError::InvalidDpi(format!(
                "dpi must be at most {}, got {}",
                MAX_DPI, self.dpi
            )));
        }

        if self.input.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath("input path is empty".into()));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath("output directory is empty".into()));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid resolution
    #[error("Invalid dpi: {0}")]
    InvalidDpi(String),

    /// Empty or unusable path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
