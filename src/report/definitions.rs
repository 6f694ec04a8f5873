//! The fixed chart gallery

use super::{Aggregation, ChartKind, ReportDefinition};
use crate::aggregate::GroupKey;
use crate::dataset::Column;

const TIME_MS: &str = "Time (ms)";
const OPERATION: &str = "Operation Type";
const TIMESTAMP: &str = "Timestamp";

const CORRELATED: [Column; 5] = [
    Column::JwtValidation,
    Column::DbQuery,
    Column::BlockchainValidation,
    Column::GasUsed,
    Column::TotalProcessing,
];

/// Charts in rendering order
pub const REPORTS: &[ReportDefinition] = &[
    ReportDefinition {
        file_name: "avg_processing_time.png",
        title: "Average Processing Time by Operation Type",
        kind: ChartKind::Bar,
        group_by: Some(GroupKey::OperationType),
        columns: &[Column::TotalProcessing],
        aggregation: Aggregation::Mean,
        x_desc: OPERATION,
        y_desc: "Average Processing Time (ms)",
        figure: (10.0, 6.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "time_distribution.png",
        title: "Processing Time Distribution by Operation Type",
        kind: ChartKind::BoxPlot,
        group_by: Some(GroupKey::OperationType),
        columns: &[Column::TotalProcessing],
        aggregation: Aggregation::None,
        x_desc: OPERATION,
        y_desc: "Processing Time (ms)",
        figure: (12.0, 6.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "gas_usage.png",
        title: "Average Gas Usage by Operation Type",
        kind: ChartKind::Bar,
        group_by: Some(GroupKey::OperationType),
        columns: &[Column::GasUsed],
        aggregation: Aggregation::Mean,
        x_desc: OPERATION,
        y_desc: "Average Gas Used",
        figure: (10.0, 6.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "component_breakdown.png",
        title: "Average Component-wise Time Breakdown",
        kind: ChartKind::Bar,
        group_by: None,
        columns: &Column::COMPONENTS,
        aggregation: Aggregation::Mean,
        x_desc: "Component",
        y_desc: "Average Time (ms)",
        figure: (12.0, 6.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "time_series.png",
        title: "Total Processing Time Over Time",
        kind: ChartKind::TimeSeries,
        group_by: None,
        columns: &[Column::TotalProcessing],
        aggregation: Aggregation::None,
        x_desc: TIMESTAMP,
        y_desc: "Total Processing Time (ms)",
        figure: (15.0, 6.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "operation_heatmap.png",
        title: "Heatmap of Operation Types vs Time Components",
        kind: ChartKind::Heatmap,
        group_by: Some(GroupKey::OperationType),
        columns: &Column::COMPONENTS,
        aggregation: Aggregation::Mean,
        x_desc: "",
        y_desc: "",
        figure: (12.0, 8.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "gas_usage_pie.png",
        title: "Gas Usage Distribution by Operation Type",
        kind: ChartKind::Pie,
        group_by: Some(GroupKey::OperationType),
        columns: &[Column::GasUsed],
        aggregation: Aggregation::Sum,
        x_desc: "",
        y_desc: "",
        figure: (10.0, 8.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "correlation_heatmap.png",
        title: "Correlation Between Different Metrics",
        kind: ChartKind::CorrelationHeatmap,
        group_by: None,
        columns: &CORRELATED,
        aggregation: Aggregation::Correlation,
        x_desc: "",
        y_desc: "",
        figure: (12.0, 10.0),
        time_ordered: false,
    },
    ReportDefinition {
        file_name: "stacked_time_components.png",
        title: "Stacked Time Components Over Time",
        kind: ChartKind::StackedArea,
        group_by: None,
        columns: &Column::COMPONENTS,
        aggregation: Aggregation::None,
        x_desc: TIMESTAMP,
        y_desc: TIME_MS,
        figure: (15.0, 8.0),
        time_ordered: true,
    },
    ReportDefinition {
        file_name: "separate_time_components.png",
        title: "",
        kind: ChartKind::StackedPanels,
        group_by: None,
        columns: &Column::DURATIONS,
        aggregation: Aggregation::None,
        x_desc: TIMESTAMP,
        y_desc: TIME_MS,
        figure: (15.0, 16.0),
        time_ordered: true,
    },
    ReportDefinition {
        file_name: "percentage_time_components.png",
        title: "Percentage Contribution of Each Time Component",
        kind: ChartKind::StackedArea,
        group_by: None,
        columns: &Column::COMPONENTS,
        aggregation: Aggregation::RowPercent,
        x_desc: TIMESTAMP,
        y_desc: "Percentage (%)",
        figure: (15.0, 8.0),
        time_ordered: true,
    },
    ReportDefinition {
        file_name: "time_components_histograms.png",
        title: "",
        kind: ChartKind::Histograms,
        group_by: None,
        columns: &Column::COMPONENTS,
        aggregation: Aggregation::None,
        x_desc: TIME_MS,
        y_desc: "Frequency",
        figure: (12.0, 12.0),
        time_ordered: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_twelve_unique_files() {
        assert_eq!(REPORTS.len(), 12);
        let names: HashSet<_> = REPORTS.iter().map(|d| d.file_name).collect();
        assert_eq!(names.len(), REPORTS.len());
        assert!(REPORTS.iter().all(|d| d.file_name.ends_with(".png")));
    }

    #[test]
    fn test_only_component_charts_need_time_order() {
        let ordered: Vec<_> = REPORTS
            .iter()
            .filter(|d| d.time_ordered)
            .map(|d| d.file_name)
            .collect();
        assert_eq!(
            ordered,
            vec![
                "stacked_time_components.png",
                "separate_time_components.png",
                "percentage_time_components.png"
            ]
        );
    }

    #[test]
    fn test_panel_charts_title_each_panel_only() {
        for def in REPORTS {
            match def.kind {
                ChartKind::StackedPanels | ChartKind::Histograms => {
                    assert!(def.title.is_empty(), "{}", def.file_name)
                }
                _ => assert!(!def.title.is_empty(), "{}", def.file_name),
            }
        }
    }

    #[test]
    fn test_matrix_charts_have_no_axis_text() {
        let matrices = REPORTS.iter().filter(|d| {
            matches!(
                d.kind,
                ChartKind::Heatmap | ChartKind::CorrelationHeatmap | ChartKind::Pie
            )
        });
        for def in matrices {
            assert_eq!((def.x_desc, def.y_desc), ("", ""), "{}", def.file_name);
        }
    }

    #[test]
    fn test_percentage_axis_label() {
        let def = REPORTS
            .iter()
            .find(|d| d.aggregation == Aggregation::RowPercent)
            .unwrap();
        assert_eq!(def.y_desc, "Percentage (%)");
    }

    #[test]
    fn test_every_definition_reads_a_column() {
        assert!(REPORTS.iter().all(|d| !d.columns.is_empty()));
    }
}
