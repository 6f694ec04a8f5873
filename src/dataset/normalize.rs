//! Normalization of raw text cells into typed records

use super::{Column, Dataset, RawDataset, RawRecord, Record, TIMESTAMP};
use crate::error::MalformedValueError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DURATION_UNIT: &str = "ms";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a `<float>ms` cell into milliseconds.
///
/// Returns `None` unless the value carries the unit and its numeric prefix
/// is finite and non-negative.
pub fn parse_duration_ms(text: &str) -> Option<f64> {
    let number = text.trim().strip_suffix(DURATION_UNIT)?.trim_end();
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a timestamp cell.
///
/// RFC 3339 values are converted to UTC; naive forms are taken as-is; a bare
/// integer is read as epoch milliseconds.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = text.parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }

    None
}

fn parse_gas(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(f64::NAN);
    }
    let value: f64 = text.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn malformed(column: &str, row: usize, value: &str) -> MalformedValueError {
    MalformedValueError {
        column: column.to_string(),
        row,
        value: value.to_string(),
    }
}

fn duration(raw: &RawRecord, column: Column, row: usize) -> Result<f64, MalformedValueError> {
    let text = raw.duration_text(column).unwrap_or_default();
    parse_duration_ms(text).ok_or_else(|| malformed(column.header(), row, text))
}

fn normalize_row(raw: &RawRecord, row: usize) -> Result<Record, MalformedValueError> {
    let timestamp =
        parse_timestamp(&raw.timestamp).ok_or_else(|| malformed(TIMESTAMP, row, &raw.timestamp))?;
    let gas_used = parse_gas(&raw.gas_used)
        .ok_or_else(|| malformed(Column::GasUsed.header(), row, &raw.gas_used))?;

    Ok(Record {
        operation_type: raw.operation_type.trim().to_string(),
        timestamp,
        jwt_validation_time_ms: duration(raw, Column::JwtValidation, row)?,
        db_query_time_ms: duration(raw, Column::DbQuery, row)?,
        blockchain_validation_time_ms: duration(raw, Column::BlockchainValidation, row)?,
        total_processing_time_ms: duration(raw, Column::TotalProcessing, row)?,
        gas_used,
    })
}

/// Convert every raw row, aborting on the first malformed cell
pub fn normalize(raw: RawDataset) -> Result<Dataset, MalformedValueError> {
    let records = raw
        .rows
        .iter()
        .enumerate()
        .map(|(row, raw)| normalize_row(raw, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn raw(total: &str, gas: &str) -> RawRecord {
        RawRecord {
            operation_type: "login".to_string(),
            timestamp: "2024-03-01 12:00:00".to_string(),
            jwt_validation_time: "1ms".to_string(),
            db_query_time: "2ms".to_string(),
            blockchain_validation_time: "3ms".to_string(),
            total_processing_time: total.to_string(),
            gas_used: gas.to_string(),
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_ms("12.5ms"), Some(12.5));
        assert_eq!(parse_duration_ms(" 7ms "), Some(7.0));
        assert_eq!(parse_duration_ms("3 ms"), Some(3.0));
        assert_eq!(parse_duration_ms("0ms"), Some(0.0));
    }

    #[test]
    fn test_parse_duration_rejects_malformed() {
        assert_eq!(parse_duration_ms("abc"), None);
        assert_eq!(parse_duration_ms("12.5"), None);
        assert_eq!(parse_duration_ms("ms"), None);
        assert_eq!(parse_duration_ms("-1ms"), None);
        assert_eq!(parse_duration_ms("NaNms"), None);
        assert_eq!(parse_duration_ms("infms"), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 15)
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-01 12:30:15"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:15"), Some(expected));
        assert_eq!(parse_timestamp("2024/03/01 12:30:15"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:15Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:15+02:00"), Some(expected));
        assert_eq!(parse_timestamp("1709296215000"), Some(expected));

        let with_millis = parse_timestamp("2024-03-01T12:30:15.250Z").unwrap();
        assert_eq!(with_millis.nanosecond(), 250_000_000);

        let date_only = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date_only.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01 00:00:00"), None);
    }

    #[test]
    fn test_normalize_total_processing_time() {
        let dataset = normalize(RawDataset {
            rows: vec![raw("12.5ms", "21000")],
        })
        .unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.total_processing_time_ms, 12.5);
        assert_eq!(record.jwt_validation_time_ms, 1.0);
        assert_eq!(record.gas_used, 21000.0);
    }

    #[test]
    fn test_normalize_names_column_and_row() {
        let err = normalize(RawDataset {
            rows: vec![raw("5ms", "1"), raw("oops", "1")],
        })
        .unwrap_err();
        assert_eq!(err.column, "Total Processing Time (ms)");
        assert_eq!(err.row, 1);
        assert_eq!(err.value, "oops");
    }

    #[test]
    fn test_empty_gas_is_missing() {
        let dataset = normalize(RawDataset {
            rows: vec![raw("5ms", "")],
        })
        .unwrap();
        assert!(dataset.records()[0].gas_used.is_nan());
    }

    #[test]
    fn test_negative_gas_rejected() {
        let err = normalize(RawDataset {
            rows: vec![raw("5ms", "-3")],
        })
        .unwrap_err();
        assert_eq!(err.column, "Gas Used");
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut row = raw("5ms", "1");
        row.timestamp = "not a time".to_string();
        let err = normalize(RawDataset { rows: vec![row] }).unwrap_err();
        assert_eq!(err.column, "Timestamp");
        assert_eq!(err.row, 0);
    }
}
