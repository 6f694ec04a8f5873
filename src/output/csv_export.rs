//! CSV export functionality

use crate::aggregate::OperationSummary;
use crate::error::ExportError;
use csv::Writer;
use std::fs::File;
use std::path::Path;

pub struct CsvExporter;

impl CsvExporter {
    /// Write one row per operation type
    pub fn export_summary(summaries: &[OperationSummary], path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let mut wtr = Writer::from_writer(file);

        wtr.write_record([
            "operation_type",
            "count",
            "avg_jwt_validation_ms",
            "avg_db_query_ms",
            "avg_blockchain_validation_ms",
            "avg_total_processing_ms",
            "avg_gas_used",
            "total_gas_used",
        ])?;

        for s in summaries {
            wtr.write_record(&[
                s.operation_type.clone(),
                s.count.to_string(),
                format_value(s.avg_jwt_validation_ms),
                format_value(s.avg_db_query_ms),
                format_value(s.avg_blockchain_validation_ms),
                format_value(s.avg_total_processing_ms),
                format_value(s.avg_gas_used),
                format_value(s.total_gas_used),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

/// Two decimals, empty for missing values
fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(op: &str, gas: f64) -> OperationSummary {
        OperationSummary {
            operation_type: op.to_string(),
            count: 2,
            avg_jwt_validation_ms: 1.0,
            avg_db_query_ms: 2.0,
            avg_blockchain_validation_ms: 3.0,
            avg_total_processing_ms: 6.0,
            avg_gas_used: gas,
            total_gas_used: 0.0,
        }
    }

    #[test]
    fn test_export_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        CsvExporter::export_summary(&[summary("mint", 21000.0), summary("burn", f64::NAN)], &path)
            .unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "operation_type");

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "mint");
        assert_eq!(&rows[0][6], "21000.00");
        assert_eq!(&rows[1][6], "");
    }

    #[test]
    fn test_export_summary_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.csv");
        let err = CsvExporter::export_summary(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
