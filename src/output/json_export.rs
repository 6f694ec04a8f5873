//! JSON export functionality

use crate::aggregate::OperationSummary;
use crate::dataset::Dataset;
use crate::error::ExportError;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub struct JsonExporter;

impl JsonExporter {
    /// Write the per-operation summary with dataset totals.
    ///
    /// Missing means serialize as `null`.
    pub fn export_summary(
        dataset: &Dataset,
        summaries: &[OperationSummary],
        path: &Path,
    ) -> Result<(), ExportError> {
        let span = dataset.time_span().map(|(start, end)| {
            json!({
                "start": start.format(TIME_FORMAT).to_string(),
                "end": end.format(TIME_FORMAT).to_string(),
            })
        });

        let output = json!({
            "total_records": dataset.len(),
            "time_span": span,
            "operations": summaries,
        });

        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(&output)?.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::dataset::Record;
    use chrono::NaiveDate;

    fn record(op: &str, second: u32, gas: f64) -> Record {
        Record {
            operation_type: op.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, second)
                .unwrap(),
            jwt_validation_time_ms: 1.0,
            db_query_time_ms: 2.0,
            blockchain_validation_time_ms: 3.0,
            total_processing_time_ms: 6.0,
            gas_used: gas,
        }
    }

    #[test]
    fn test_export_summary_document() {
        let dataset = Dataset::new(vec![
            record("mint", 5, 100.0),
            record("burn", 1, f64::NAN),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        JsonExporter::export_summary(&dataset, &summarize(&dataset), &path).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["total_records"], 2);
        assert_eq!(doc["time_span"]["start"], "2024-03-01 12:00:01.000");
        assert_eq!(doc["time_span"]["end"], "2024-03-01 12:00:05.000");

        let ops = doc["operations"].as_array().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0]["operation_type"], "mint");
        assert_eq!(ops[0]["total_gas_used"], 100.0);
        assert!(ops[1]["avg_gas_used"].is_null());
    }
}
