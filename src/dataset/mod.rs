//! Operation metrics dataset
//!
//! A dataset is loaded in two steps: [`RawDataset::from_path`] reads the CSV
//! and checks the header, then [`normalize`](normalize::normalize) turns the
//! unit-suffixed text cells into numbers and timestamps.

pub mod normalize;

use crate::error::{LoadError, ReportError};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

pub use normalize::{normalize, parse_duration_ms, parse_timestamp};

/// Header of the grouping column
pub const OPERATION_TYPE: &str = "Operation Type";
/// Header of the timestamp column
pub const TIMESTAMP: &str = "Timestamp";

/// Numeric columns of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    JwtValidation,
    DbQuery,
    BlockchainValidation,
    TotalProcessing,
    GasUsed,
}

impl Column {
    /// The three sub-components that make up a request's processing time
    pub const COMPONENTS: [Column; 3] = [
        Column::JwtValidation,
        Column::DbQuery,
        Column::BlockchainValidation,
    ];

    /// Columns stored as `<float>ms` text in the input file
    pub const DURATIONS: [Column; 4] = [
        Column::JwtValidation,
        Column::DbQuery,
        Column::BlockchainValidation,
        Column::TotalProcessing,
    ];

    pub const ALL: [Column; 5] = [
        Column::JwtValidation,
        Column::DbQuery,
        Column::BlockchainValidation,
        Column::TotalProcessing,
        Column::GasUsed,
    ];

    /// Exact CSV header
    pub fn header(self) -> &'static str {
        match self {
            Column::JwtValidation => "JWT Validation Time (ms)",
            Column::DbQuery => "DB Query Time (ms)",
            Column::BlockchainValidation => "Blockchain Validation Time (ms)",
            Column::TotalProcessing => "Total Processing Time (ms)",
            Column::GasUsed => "Gas Used",
        }
    }

    /// Short label used in legends and panel titles
    pub fn label(self) -> &'static str {
        match self {
            Column::JwtValidation => "JWT Validation",
            Column::DbQuery => "DB Query",
            Column::BlockchainValidation => "Blockchain Validation",
            Column::TotalProcessing => "Total Processing",
            Column::GasUsed => "Gas Used",
        }
    }

    pub fn value(self, record: &Record) -> f64 {
        match self {
            Column::JwtValidation => record.jwt_validation_time_ms,
            Column::DbQuery => record.db_query_time_ms,
            Column::BlockchainValidation => record.blockchain_validation_time_ms,
            Column::TotalProcessing => record.total_processing_time_ms,
            Column::GasUsed => record.gas_used,
        }
    }
}

/// Every header the input file must carry
pub fn required_headers() -> Vec<&'static str> {
    let mut headers = vec![OPERATION_TYPE, TIMESTAMP];
    headers.extend(Column::ALL.iter().map(|c| c.header()));
    headers
}

/// A row as it appears in the file, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Operation Type")]
    pub operation_type: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "JWT Validation Time (ms)")]
    pub jwt_validation_time: String,
    #[serde(rename = "DB Query Time (ms)")]
    pub db_query_time: String,
    #[serde(rename = "Blockchain Validation Time (ms)")]
    pub blockchain_validation_time: String,
    #[serde(rename = "Total Processing Time (ms)")]
    pub total_processing_time: String,
    #[serde(rename = "Gas Used")]
    pub gas_used: String,
}

impl RawRecord {
    /// Raw text of a duration column
    pub fn duration_text(&self, column: Column) -> Option<&str> {
        match column {
            Column::JwtValidation => Some(&self.jwt_validation_time),
            Column::DbQuery => Some(&self.db_query_time),
            Column::BlockchainValidation => Some(&self.blockchain_validation_time),
            Column::TotalProcessing => Some(&self.total_processing_time),
            Column::GasUsed => None,
        }
    }
}

/// Rows read from the input file, in source order
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub rows: Vec<RawRecord>,
}

impl RawDataset {
    /// Read a CSV file, failing before any row is parsed if a column is missing
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_path(path)
            .map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv(reader)
    }

    /// Read CSV content from any reader
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, LoadError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(rdr);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, LoadError> {
        let headers = reader.headers()?.clone();
        for required in required_headers() {
            if !headers.iter().any(|h| h == required) {
                return Err(LoadError::MissingColumn(required.to_string()));
            }
        }

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: RawRecord = result?;
            rows.push(row);
        }

        tracing::debug!("Read {} rows", rows.len());
        Ok(Self { rows })
    }
}

/// One measured operation instance
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub operation_type: String,
    pub timestamp: NaiveDateTime,
    pub jwt_validation_time_ms: f64,
    pub db_query_time_ms: f64,
    pub blockchain_validation_time_ms: f64,
    pub total_processing_time_ms: f64,
    /// NaN when the cell was empty
    pub gas_used: f64,
}

/// Normalized records sharing one schema
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load and normalize a metrics file
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = RawDataset::from_path(path)?;
        Ok(normalize(raw)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// All values of one column, in current row order
    pub fn values(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| column.value(r)).collect()
    }

    /// Distinct operation types in order of first appearance
    pub fn operation_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.operation_type.as_str()) {
                seen.push(&record.operation_type);
            }
        }
        seen
    }

    /// Stable ascending sort on timestamp
    pub fn sort_by_timestamp(&mut self) {
        self.records.sort_by_key(|r| r.timestamp);
    }

    pub fn is_time_ordered(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Earliest and latest timestamp
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.records.iter().map(|r| r.timestamp).min()?;
        let max = self.records.iter().map(|r| r.timestamp).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Operation Type,Timestamp,JWT Validation Time (ms),DB Query Time (ms),Blockchain Validation Time (ms),Total Processing Time (ms),Gas Used";

    #[test]
    fn test_reads_rows_in_source_order() {
        let csv = format!(
            "{HEADER}\nlogin,2024-01-01 10:00:00,1.5ms,2ms,30ms,33.5ms,21000\n\
             register,2024-01-01 09:00:00,1ms,3ms,40ms,44ms,50000\n"
        );
        let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0].operation_type, "login");
        assert_eq!(raw.rows[1].total_processing_time, "44ms");
    }

    #[test]
    fn test_missing_gas_column_is_load_error() {
        let csv = "Operation Type,Timestamp,JWT Validation Time (ms),DB Query Time (ms),Blockchain Validation Time (ms),Total Processing Time (ms)\n\
                   login,2024-01-01 10:00:00,1ms,2ms,3ms,6ms\n";
        let err = RawDataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::MissingColumn(name) => assert_eq!(name, "Gas Used"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_and_reordered_headers() {
        let csv = "Gas Used,Extra,Operation Type,Timestamp,Total Processing Time (ms),JWT Validation Time (ms),DB Query Time (ms),Blockchain Validation Time (ms)\n\
                   100,x,login,2024-01-01 10:00:00,6ms,1ms,2ms,3ms\n";
        let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(raw.rows[0].gas_used, "100");
        assert_eq!(raw.rows[0].jwt_validation_time, "1ms");
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = RawDataset::from_path(Path::new("/nonexistent/metrics.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_sort_by_timestamp_is_stable() {
        let csv = format!(
            "{HEADER}\nb,2024-01-01 10:00:00,1ms,1ms,1ms,3ms,1\n\
             a,2024-01-01 09:00:00,1ms,1ms,1ms,3ms,1\n\
             c,2024-01-01 10:00:00,1ms,1ms,1ms,3ms,1\n"
        );
        let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
        let mut dataset = normalize(raw).unwrap();
        assert!(!dataset.is_time_ordered());

        dataset.sort_by_timestamp();
        let order: Vec<&str> = dataset.iter().map(|r| r.operation_type.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(dataset.is_time_ordered());
    }

    #[test]
    fn test_operation_types_first_occurrence() {
        let csv = format!(
            "{HEADER}\nb,2024-01-01 10:00:00,1ms,1ms,1ms,3ms,1\n\
             a,2024-01-01 09:00:00,1ms,1ms,1ms,3ms,1\n\
             b,2024-01-01 11:00:00,1ms,1ms,1ms,3ms,1\n"
        );
        let dataset = normalize(RawDataset::from_reader(csv.as_bytes()).unwrap()).unwrap();
        assert_eq!(dataset.operation_types(), vec!["b", "a"]);
    }
}
