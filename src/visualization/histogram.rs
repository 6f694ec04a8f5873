//! Histogram plots for latency distributions

use super::theme::{self, Theme};
use super::Canvas;
use crate::aggregate::{gaussian_kde, Histogram};
use anyhow::Result;
use plotters::prelude::*;

const KDE_POINTS: usize = 200;

/// One distribution to plot in its own panel
pub struct HistogramPanel {
    pub title: String,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

/// KDE curve scaled to histogram counts
fn density_curve(values: &[f64], hist: &Histogram) -> Vec<(f64, f64)> {
    let (lo, hi) = hist.range();
    let grid: Vec<f64> = (0..KDE_POINTS)
        .map(|i| lo + (hi - lo) * i as f64 / (KDE_POINTS - 1) as f64)
        .collect();
    let Some(density) = gaussian_kde(values, &grid) else {
        return Vec::new();
    };
    let scale = hist.total() as f64 * hist.bin_width();
    grid.into_iter()
        .zip(density)
        .map(|(x, d)| (x, d * scale))
        .collect()
}

/// Distribution histograms
pub struct HistogramPlotter;

impl HistogramPlotter {
    /// Plot one histogram with density overlay per panel, stacked vertically
    pub fn plot_panels(
        area: &Canvas,
        theme: &Theme,
        x_desc: &str,
        y_desc: &str,
        panels: &[HistogramPanel],
    ) -> Result<()> {
        let cells = area.split_evenly((panels.len().max(1), 1));
        let line = theme.line_width();

        for (panel, cell) in panels.iter().zip(cells.iter()) {
            let Some(hist) = Histogram::from_values(&panel.values) else {
                cell.titled(&panel.title, theme.panel_title_font())?;
                continue;
            };

            let curve = density_curve(&panel.values, &hist);
            let peak = curve
                .iter()
                .map(|p| p.1)
                .fold(hist.max_count() as f64, f64::max);
            let (lo, hi) = hist.range();

            let mut chart = ChartBuilder::on(cell)
                .caption(panel.title.as_str(), theme.panel_title_font())
                .margin(theme.margin())
                .x_label_area_size(theme.label_area())
                .y_label_area_size(theme.label_area() * 2)
                .build_cartesian_2d(lo..hi, 0f64..(peak * 1.1).max(1.0))?;

            chart.plotting_area().fill(&theme::BACKGROUND)?;

            chart
                .configure_mesh()
                .bold_line_style(WHITE.stroke_width(1))
                .light_line_style(&WHITE.mix(0.5))
                .x_desc(x_desc)
                .y_desc(y_desc)
                .x_label_formatter(&|x| format!("{:.1}", x))
                .y_label_formatter(&|y| format!("{:.0}", y))
                .label_style(theme.tick_font())
                .axis_desc_style(theme.axis_font())
                .draw()?;

            // Draw bars
            let bars = hist.counts.iter().enumerate().map(|(idx, &count)| {
                [(hist.edges[idx], 0.0), (hist.edges[idx + 1], count as f64)]
            });
            chart.draw_series(
                bars.clone()
                    .map(|corners| Rectangle::new(corners, panel.color.mix(0.6).filled())),
            )?;
            chart.draw_series(
                bars.map(|corners| Rectangle::new(corners, panel.color.stroke_width(1))),
            )?;

            chart.draw_series(LineSeries::new(curve, panel.color.stroke_width(line)))?;
        }

        Ok(())
    }
}
