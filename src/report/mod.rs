//! Report definitions and the generator that renders them
//!
//! Each chart is described by a [`ReportDefinition`]: which column(s) it
//! reads, how it aggregates them and what kind of chart it draws. The fixed
//! gallery lives in [`REPORTS`] and is rendered in order by
//! [`ReportGenerator::run`].

pub mod definitions;

use crate::aggregate::{
    column_means, correlation_matrix, descending, mean_by_group, row_percentages, sum_by_group,
    GroupKey, Grouped, Quartiles,
};
use crate::dataset::{Column, Dataset};
use crate::error::RenderError;
use crate::visualization::matrix::{self, Heatmap, Mask};
use crate::visualization::{
    render_png, theme, time_coord, BarLabels, BarPlotter, BoxPlotter, Canvas, HeatmapPlotter,
    HistogramPanel, HistogramPlotter, Layer, Panel, PiePlotter, Theme, TimelinePlotter,
};
use std::path::{Path, PathBuf};

pub use definitions::REPORTS;

/// Kind of chart a definition draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    BoxPlot,
    TimeSeries,
    Heatmap,
    Pie,
    CorrelationHeatmap,
    StackedArea,
    StackedPanels,
    Histograms,
}

/// Reduction applied to the value columns before drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    None,
    Mean,
    Sum,
    /// Each row's share of the row-wise sum, in percent
    RowPercent,
    Correlation,
}

/// Static description of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefinition {
    pub file_name: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub group_by: Option<GroupKey>,
    pub columns: &'static [Column],
    pub aggregation: Aggregation,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    /// Width and height in inches
    pub figure: (f64, f64),
    /// Rows must be sorted by timestamp before rendering
    pub time_ordered: bool,
}

impl ReportDefinition {
    fn labels(&self) -> BarLabels<'_> {
        BarLabels {
            title: self.title,
            x_desc: self.x_desc,
            y_desc: self.y_desc,
        }
    }

    fn key(&self) -> GroupKey {
        self.group_by.unwrap_or(GroupKey::OperationType)
    }

    fn first_column(&self) -> Column {
        self.columns.first().copied().unwrap_or(Column::TotalProcessing)
    }
}

/// Rendering options shared by every chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Pixels per inch of figure size
    pub dpi: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { dpi: 300 }
    }
}

fn grouped(dataset: &Dataset, def: &ReportDefinition, column: Column) -> Grouped {
    match def.aggregation {
        Aggregation::Sum => sum_by_group(dataset, def.key(), column),
        _ => mean_by_group(dataset, def.key(), column),
    }
}

fn entries(grouped: &Grouped) -> Vec<(String, f64)> {
    grouped.iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Bars ranked by value: per group, or one bar per column when ungrouped
fn bar_data(dataset: &Dataset, def: &ReportDefinition) -> Vec<(String, f64)> {
    match def.group_by {
        Some(_) => entries(&grouped(dataset, def, def.first_column()).ranked()),
        None => {
            let mut means: Vec<(String, f64)> = column_means(dataset, def.columns)
                .into_iter()
                .map(|(c, v)| (c.header().to_string(), v))
                .collect();
            means.sort_by(|a, b| descending(a.1, b.1));
            means
        }
    }
}

fn box_data(dataset: &Dataset, def: &ReportDefinition) -> Vec<(String, Option<Quartiles>)> {
    let key = def.key();
    let column = def.first_column();
    dataset
        .operation_types()
        .into_iter()
        .map(|group| {
            let values: Vec<f64> = dataset
                .iter()
                .filter(|r| key.key(r) == group)
                .map(|r| column.value(r))
                .collect();
            (group.to_string(), Quartiles::from_values(&values))
        })
        .collect()
}

fn operation_heatmap<'a>(dataset: &Dataset, def: &'a ReportDefinition) -> Heatmap<'a> {
    let per_column: Vec<Grouped> = def
        .columns
        .iter()
        .map(|&c| grouped(dataset, def, c).sorted_by_key())
        .collect();
    let row_names: Vec<String> = per_column
        .first()
        .map(|g| g.keys().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    let values: Vec<Vec<f64>> = (0..row_names.len())
        .map(|r| per_column.iter().map(|g| g.values()[r]).collect())
        .collect();

    Heatmap {
        title: def.title,
        row_names,
        col_names: def.columns.iter().map(|c| c.header().to_string()).collect(),
        range: matrix::value_span(&values),
        values,
        mask: Mask::None,
        colormap: theme::viridis,
        precision: 1,
    }
}

fn correlation_heatmap<'a>(dataset: &Dataset, def: &'a ReportDefinition) -> Heatmap<'a> {
    let corr = correlation_matrix(dataset, def.columns);
    let names: Vec<String> = def.columns.iter().map(|c| c.header().to_string()).collect();
    let values = (0..corr.size())
        .map(|i| (0..corr.size()).map(|j| corr.get(i, j)).collect())
        .collect();

    Heatmap {
        title: def.title,
        row_names: names.clone(),
        col_names: names,
        values,
        mask: Mask::UpperTriangle,
        range: (-1.0, 1.0),
        colormap: theme::coolwarm,
        precision: 2,
    }
}

fn stacked_layers(dataset: &Dataset, def: &ReportDefinition) -> Vec<Layer> {
    match def.aggregation {
        Aggregation::RowPercent => {
            let shares = row_percentages(dataset, def.columns);
            def.columns
                .iter()
                .enumerate()
                .map(|(k, c)| Layer {
                    name: c.label().to_string(),
                    values: shares.iter().map(|row| row[k]).collect(),
                })
                .collect()
        }
        _ => def
            .columns
            .iter()
            .map(|&c| Layer {
                name: c.label().to_string(),
                values: dataset.values(c),
            })
            .collect(),
    }
}

fn time_axis(dataset: &Dataset) -> Vec<f64> {
    dataset.iter().map(|r| time_coord(&r.timestamp)).collect()
}

fn draw(
    area: &Canvas,
    theme: &Theme,
    def: &ReportDefinition,
    dataset: &Dataset,
) -> anyhow::Result<()> {
    match def.kind {
        ChartKind::Bar => BarPlotter::draw(area, theme, &def.labels(), &bar_data(dataset, def)),
        ChartKind::BoxPlot => {
            BoxPlotter::draw(area, theme, &def.labels(), &box_data(dataset, def))
        }
        ChartKind::TimeSeries => {
            let column = def.first_column();
            let points: Vec<(f64, f64)> = dataset
                .iter()
                .map(|r| (time_coord(&r.timestamp), column.value(r)))
                .collect();
            TimelinePlotter::draw_line(area, theme, &def.labels(), &points)
        }
        ChartKind::Heatmap => HeatmapPlotter::draw(area, theme, &operation_heatmap(dataset, def)),
        ChartKind::CorrelationHeatmap => {
            HeatmapPlotter::draw(area, theme, &correlation_heatmap(dataset, def))
        }
        ChartKind::Pie => {
            let slices = entries(&grouped(dataset, def, def.first_column()).sorted_by_key());
            PiePlotter::draw(area, theme, def.title, &slices)
        }
        ChartKind::StackedArea => {
            let y_limit = (def.aggregation == Aggregation::RowPercent).then_some(100.0);
            TimelinePlotter::draw_stacked(
                area,
                theme,
                &def.labels(),
                &time_axis(dataset),
                &stacked_layers(dataset, def),
                y_limit,
            )
        }
        ChartKind::StackedPanels => {
            let panels: Vec<Panel> = def
                .columns
                .iter()
                .enumerate()
                .map(|(i, &c)| Panel {
                    title: format!("{} Time", c.label()),
                    values: dataset.values(c),
                    color: theme::PANEL_COLORS[i % theme::PANEL_COLORS.len()],
                })
                .collect();
            let xs = time_axis(dataset);
            TimelinePlotter::draw_panels(area, theme, def.x_desc, def.y_desc, &xs, &panels)
        }
        ChartKind::Histograms => {
            let colors = theme::viridis_palette(def.columns.len());
            let panels: Vec<HistogramPanel> = def
                .columns
                .iter()
                .zip(colors)
                .map(|(&c, color)| HistogramPanel {
                    title: format!("Distribution of {} Time", c.label()),
                    values: dataset.values(c),
                    color,
                })
                .collect();
            HistogramPlotter::plot_panels(area, theme, def.x_desc, def.y_desc, &panels)
        }
    }
}

/// Render one definition into `out_dir`, returning the written path
pub fn render(
    def: &ReportDefinition,
    dataset: &Dataset,
    settings: &RenderSettings,
    out_dir: &Path,
) -> Result<PathBuf, RenderError> {
    if dataset.is_empty() {
        return Err(RenderError::EmptyDataset {
            file: def.file_name.to_string(),
        });
    }

    let path = out_dir.join(def.file_name);
    let theme = Theme::new(settings.dpi);
    let size = theme.figure_size(def.figure);

    render_png(&path, size, |area| draw(area, &theme, def, dataset))
        .map_err(|e| RenderError::drawing(def.file_name, format!("{:#}", e)))?;

    Ok(path)
}

/// Renders the fixed gallery over one dataset
pub struct ReportGenerator {
    dataset: Dataset,
    output_dir: PathBuf,
    settings: RenderSettings,
}

impl ReportGenerator {
    pub fn new(dataset: Dataset, output_dir: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            dataset,
            output_dir: output_dir.into(),
            settings,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render every definition in [`REPORTS`]
    pub fn run(&mut self) -> Result<Vec<PathBuf>, RenderError> {
        self.run_with(|_, _| {})
    }

    /// Render every definition, calling `on_rendered` after each file is written.
    ///
    /// The first time-ordered definition sorts the dataset by timestamp; the
    /// new order is kept for the definitions after it.
    pub fn run_with<F>(&mut self, mut on_rendered: F) -> Result<Vec<PathBuf>, RenderError>
    where
        F: FnMut(&ReportDefinition, &Path),
    {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(REPORTS.len());
        for (idx, def) in REPORTS.iter().enumerate() {
            if def.time_ordered && !self.dataset.is_time_ordered() {
                tracing::debug!("Sorting {} records by timestamp", self.dataset.len());
                self.dataset.sort_by_timestamp();
            }

            tracing::info!("Rendering chart {}/{}: {}", idx + 1, REPORTS.len(), def.file_name);
            let path = render(def, &self.dataset, &self.settings, &self.output_dir)?;
            on_rendered(def, &path);
            written.push(path);
        }

        Ok(written)
    }
}
