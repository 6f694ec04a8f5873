//! Grouping and reducing functions over a dataset
//!
//! Missing values (NaN) are skipped by every reduction. A group whose values
//! are all missing keeps its key and reports NaN for the mean.

pub mod distribution;

use crate::dataset::{Column, Dataset, Record};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub use distribution::{gaussian_kde, Histogram, Quartiles};

/// Column a dataset can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    OperationType,
}

impl GroupKey {
    pub fn key<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            GroupKey::OperationType => &record.operation_type,
        }
    }
}

/// Aggregated scalar per group key, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grouped {
    entries: Vec<(String, f64)>,
}

impl Grouped {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    /// Sorted by value descending; ties keep first occurrence, NaN goes last
    pub fn ranked(&self) -> Grouped {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| descending(a.1, b.1));
        Grouped { entries }
    }

    /// Sorted lexically by key
    pub fn sorted_by_key(&self) -> Grouped {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Grouped { entries }
    }
}

/// Descending order for floats with NaN sorted last
pub fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Sum and count of defined values per key
fn accumulate(dataset: &Dataset, key: GroupKey, column: Column) -> Vec<(String, f64, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for record in dataset.iter() {
        let k = key.key(record);
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k.to_string(), 0.0, 0));
            groups.len() - 1
        });
        let value = column.value(record);
        if !value.is_nan() {
            groups[slot].1 += value;
            groups[slot].2 += 1;
        }
    }

    groups
}

/// Arithmetic mean of `column` per group
pub fn mean_by_group(dataset: &Dataset, key: GroupKey, column: Column) -> Grouped {
    let entries = accumulate(dataset, key, column)
        .into_iter()
        .map(|(k, sum, count)| {
            let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
            (k, mean)
        })
        .collect();
    Grouped { entries }
}

/// Sum of `column` per group
pub fn sum_by_group(dataset: &Dataset, key: GroupKey, column: Column) -> Grouped {
    let entries = accumulate(dataset, key, column)
        .into_iter()
        .map(|(k, sum, _)| (k, sum))
        .collect();
    Grouped { entries }
}

/// Number of rows per group
pub fn count_by_group(dataset: &Dataset, key: GroupKey) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in dataset.iter() {
        let k = key.key(record);
        match counts.iter_mut().find(|(existing, _)| existing == k) {
            Some((_, n)) => *n += 1,
            None => counts.push((k.to_string(), 1)),
        }
    }
    counts
}

/// Mean of the defined values, NaN when there are none
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Mean of each column over all rows
pub fn column_means(dataset: &Dataset, columns: &[Column]) -> Vec<(Column, f64)> {
    columns
        .iter()
        .map(|&c| (c, mean(&dataset.values(c))))
        .collect()
}

/// Pearson correlation between named columns
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

fn complete_pairs(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect()
}

/// Symmetric correlation matrix using pairwise-complete observations
pub fn correlation_matrix(dataset: &Dataset, columns: &[Column]) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = columns.iter().map(|&c| dataset.values(c)).collect();
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        let own = complete_pairs(&series[i], &series[i]);
        values[i][i] = if pearson(&own).is_nan() { f64::NAN } else { 1.0 };

        for j in 0..i {
            let r = pearson(&complete_pairs(&series[i], &series[j]));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

/// Per-row share (percent) of each column in the row-wise sum.
///
/// A row summing to zero gets NaN for every share.
pub fn row_percentages(dataset: &Dataset, columns: &[Column]) -> Vec<Vec<f64>> {
    dataset
        .iter()
        .map(|record| {
            let parts: Vec<f64> = columns.iter().map(|c| c.value(record)).collect();
            let total: f64 = parts.iter().sum();
            if total == 0.0 || !total.is_finite() {
                vec![f64::NAN; parts.len()]
            } else {
                parts.iter().map(|p| p / total * 100.0).collect()
            }
        })
        .collect()
}

/// Per-operation rollup written by the summary export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub operation_type: String,
    pub count: usize,
    pub avg_jwt_validation_ms: f64,
    pub avg_db_query_ms: f64,
    pub avg_blockchain_validation_ms: f64,
    pub avg_total_processing_ms: f64,
    pub avg_gas_used: f64,
    pub total_gas_used: f64,
}

/// One summary per operation type, ordered by each type's first row in the
/// dataset as currently ordered
pub fn summarize(dataset: &Dataset) -> Vec<OperationSummary> {
    let key = GroupKey::OperationType;
    let means: Vec<Grouped> = Column::ALL
        .iter()
        .map(|&c| mean_by_group(dataset, key, c))
        .collect();
    let gas_totals = sum_by_group(dataset, key, Column::GasUsed);
    let mean_of = |column: usize, op: &str| means[column].get(op).unwrap_or(f64::NAN);

    count_by_group(dataset, key)
        .into_iter()
        .map(|(op, count)| OperationSummary {
            avg_jwt_validation_ms: mean_of(0, &op),
            avg_db_query_ms: mean_of(1, &op),
            avg_blockchain_validation_ms: mean_of(2, &op),
            avg_total_processing_ms: mean_of(3, &op),
            avg_gas_used: mean_of(4, &op),
            total_gas_used: gas_totals.get(&op).unwrap_or(0.0),
            operation_type: op,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(op: &str, total: f64, gas: f64) -> Record {
        Record {
            operation_type: op.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            jwt_validation_time_ms: total / 4.0,
            db_query_time_ms: total / 4.0,
            blockchain_validation_time_ms: total / 2.0,
            total_processing_time_ms: total,
            gas_used: gas,
        }
    }

    #[test]
    fn test_mean_by_group() {
        let dataset = Dataset::new(vec![
            record("login", 10.0, 1.0),
            record("login", 20.0, 1.0),
            record("login", 30.0, 1.0),
        ]);
        let means = mean_by_group(&dataset, GroupKey::OperationType, Column::TotalProcessing);
        assert_eq!(means.len(), 1);
        assert_eq!(means.get("login"), Some(20.0));
    }

    #[test]
    fn test_empty_dataset_has_no_groups() {
        let means = mean_by_group(&Dataset::default(), GroupKey::OperationType, Column::GasUsed);
        assert!(means.is_empty());
        assert!(means.ranked().is_empty());
        assert!(summarize(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_sum_by_group() {
        let dataset = Dataset::new(vec![
            record("mint", 1.0, 100.0),
            record("mint", 1.0, 200.0),
            record("mint", 1.0, 300.0),
        ]);
        let sums = sum_by_group(&dataset, GroupKey::OperationType, Column::GasUsed);
        assert_eq!(sums.get("mint"), Some(600.0));
    }

    #[test]
    fn test_all_missing_group_is_nan() {
        let dataset = Dataset::new(vec![
            record("a", 1.0, f64::NAN),
            record("b", 1.0, 5.0),
            record("b", 1.0, f64::NAN),
        ]);
        let means = mean_by_group(&dataset, GroupKey::OperationType, Column::GasUsed);
        assert_eq!(means.len(), 2);
        assert!(means.get("a").unwrap().is_nan());
        assert_eq!(means.get("b"), Some(5.0));
    }

    #[test]
    fn test_ranked_descending_ties_first_occurrence() {
        let dataset = Dataset::new(vec![
            record("slow", 50.0, 0.0),
            record("tie-first", 10.0, 0.0),
            record("fastest", 5.0, 0.0),
            record("tie-second", 10.0, 0.0),
        ]);
        let ranked =
            mean_by_group(&dataset, GroupKey::OperationType, Column::TotalProcessing).ranked();
        assert_eq!(
            ranked.keys(),
            vec!["slow", "tie-first", "tie-second", "fastest"]
        );
    }

    #[test]
    fn test_ranked_puts_nan_last() {
        let dataset = Dataset::new(vec![
            record("missing", 1.0, f64::NAN),
            record("low", 1.0, 1.0),
            record("high", 1.0, 9.0),
        ]);
        let ranked = mean_by_group(&dataset, GroupKey::OperationType, Column::GasUsed).ranked();
        assert_eq!(ranked.keys(), vec!["high", "low", "missing"]);
    }

    #[test]
    fn test_sorted_by_key() {
        let dataset = Dataset::new(vec![record("b", 1.0, 1.0), record("a", 1.0, 1.0)]);
        let sorted =
            sum_by_group(&dataset, GroupKey::OperationType, Column::GasUsed).sorted_by_key();
        assert_eq!(sorted.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_correlation_symmetric_unit_diagonal() {
        let mut records = Vec::new();
        for (i, gas) in [3.0, 1.0, 4.0, 1.0, 5.0, 9.0].iter().enumerate() {
            let mut r = record("op", 10.0 + i as f64 * 3.0, *gas);
            r.db_query_time_ms = (i as f64 * 1.7).sin() + 2.0;
            records.push(r);
        }
        let dataset = Dataset::new(records);
        let matrix = correlation_matrix(&dataset, &Column::ALL);

        for i in 0..matrix.size() {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..matrix.size() {
                let (a, b) = (matrix.get(i, j), matrix.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }

        // jwt and total are both linear in the row index
        let jwt = 0;
        let total = 3;
        assert!((matrix.get(jwt, total) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_constant_column_is_nan() {
        let dataset = Dataset::new(vec![
            record("op", 1.0, 7.0),
            record("op", 2.0, 7.0),
            record("op", 3.0, 7.0),
        ]);
        let matrix = correlation_matrix(&dataset, &[Column::TotalProcessing, Column::GasUsed]);
        assert_eq!(matrix.get(0, 0), 1.0);
        assert!(matrix.get(1, 1).is_nan());
        assert!(matrix.get(0, 1).is_nan());
    }

    #[test]
    fn test_correlation_pairwise_complete() {
        let dataset = Dataset::new(vec![
            record("op", 1.0, 10.0),
            record("op", 2.0, f64::NAN),
            record("op", 3.0, 30.0),
            record("op", 4.0, 40.0),
        ]);
        let matrix = correlation_matrix(&dataset, &[Column::TotalProcessing, Column::GasUsed]);
        // Remaining pairs (1,10), (3,30), (4,40) are perfectly linear
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_percentages_sum_to_100() {
        let mut zero = record("op", 0.0, 0.0);
        zero.jwt_validation_time_ms = 0.0;
        let dataset = Dataset::new(vec![
            record("op", 12.0, 0.0),
            record("op", 7.3, 0.0),
            zero,
        ]);
        let shares = row_percentages(&dataset, &Column::COMPONENTS);

        for row in &shares[..2] {
            let total: f64 = row.iter().sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
        assert!(shares[2].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_column_means() {
        let dataset = Dataset::new(vec![record("a", 8.0, 1.0), record("b", 16.0, 3.0)]);
        let means = column_means(&dataset, &[Column::TotalProcessing, Column::GasUsed]);
        assert_eq!(means, vec![(Column::TotalProcessing, 12.0), (Column::GasUsed, 2.0)]);
    }

    #[test]
    fn test_count_by_group() {
        let dataset = Dataset::new(vec![
            record("a", 1.0, 1.0),
            record("b", 1.0, 1.0),
            record("a", 1.0, 1.0),
        ]);
        assert_eq!(
            count_by_group(&dataset, GroupKey::OperationType),
            vec![("a".to_string(), 2), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_summarize_one_row_per_operation() {
        let dataset = Dataset::new(vec![
            record("mint", 8.0, 100.0),
            record("burn", 4.0, f64::NAN),
            record("mint", 16.0, 300.0),
        ]);
        let summary = summarize(&dataset);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].operation_type, "mint");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].avg_total_processing_ms, 12.0);
        assert_eq!(summary[0].avg_jwt_validation_ms, 3.0);
        assert_eq!(summary[0].total_gas_used, 400.0);

        assert_eq!(summary[1].operation_type, "burn");
        assert!(summary[1].avg_gas_used.is_nan());
        assert_eq!(summary[1].total_gas_used, 0.0);
    }
}
