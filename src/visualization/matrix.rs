//! Annotated heatmaps with a color bar

use super::theme::{self, Theme};
use super::{category_label, category_range, Canvas};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Share of the figure width given to the heatmap itself
const MAIN_WIDTH: f64 = 0.86;
const COLORBAR_STEPS: usize = 100;

/// Which cells a heatmap leaves blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    None,
    /// Hide the diagonal and everything above it
    UpperTriangle,
}

impl Mask {
    fn hides(&self, row: usize, col: usize) -> bool {
        match self {
            Mask::None => false,
            Mask::UpperTriangle => col >= row,
        }
    }
}

pub struct Heatmap<'a> {
    pub title: &'a str,
    pub row_names: Vec<String>,
    pub col_names: Vec<String>,
    /// `values[row][col]`
    pub values: Vec<Vec<f64>>,
    pub mask: Mask,
    /// Value mapped to the two ends of the colormap
    pub range: (f64, f64),
    pub colormap: fn(f64) -> RGBColor,
    /// Decimal places of the cell annotations
    pub precision: usize,
}

impl Heatmap<'_> {
    fn color_of(&self, value: f64) -> RGBColor {
        let (lo, hi) = self.range;
        let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.5 };
        (self.colormap)(t)
    }
}

/// Finite min and max of a matrix, widened when degenerate
pub fn value_span(values: &[Vec<f64>]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi <= lo {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

/// Annotated heatmaps
pub struct HeatmapPlotter;

impl HeatmapPlotter {
    pub fn draw(area: &Canvas, theme: &Theme, heatmap: &Heatmap) -> Result<()> {
        let (width, _) = area.dim_in_pixel();
        let main_width = (width as f64 * MAIN_WIDTH) as u32;
        let (main, side) = area.split_horizontally(main_width);

        let rows = heatmap.row_names.len();
        let cols = heatmap.col_names.len();
        // First row is drawn at the top
        let flipped_rows: Vec<String> = heatmap.row_names.iter().rev().cloned().collect();

        let mut chart = ChartBuilder::on(&main)
            .caption(heatmap.title, theme.title_font())
            .margin(theme.margin())
            .x_label_area_size(theme.label_area())
            .y_label_area_size(theme.label_area() * 3)
            .build_cartesian_2d(category_range(cols), category_range(rows))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(cols.max(1))
            .y_labels(rows.max(1))
            .x_label_formatter(&|x| category_label(&heatmap.col_names, *x))
            .y_label_formatter(&|y| category_label(&flipped_rows, *y))
            .label_style(theme.tick_font())
            .draw()?;

        let annotation = theme.font(10.0);
        let centered = Pos::new(HPos::Center, VPos::Center);

        for (r, row) in heatmap.values.iter().enumerate() {
            let y = (rows - 1 - r) as f64;
            for (c, &value) in row.iter().enumerate() {
                if heatmap.mask.hides(r, c) || !value.is_finite() {
                    continue;
                }
                let x = c as f64;
                let fill = heatmap.color_of(value);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    fill.filled(),
                )))?;

                let ink = if theme::is_dark(&fill) { WHITE } else { BLACK };
                chart.draw_series(std::iter::once(Text::new(
                    format!("{:.*}", heatmap.precision, value),
                    (x, y),
                    annotation.color(&ink).pos(centered),
                )))?;
            }
        }

        draw_colorbar(&side, theme, heatmap)
    }
}

fn draw_colorbar(area: &Canvas, theme: &Theme, heatmap: &Heatmap) -> Result<()> {
    let (lo, hi) = heatmap.range;
    let step = (hi - lo) / COLORBAR_STEPS as f64;
    let precision = heatmap.precision;

    let mut chart = ChartBuilder::on(area)
        .margin_top(theme.px_u32(30.0))
        .margin_bottom(theme.label_area() + theme.margin())
        .margin_right(theme.margin())
        .y_label_area_size(theme.label_area() * 2)
        .build_cartesian_2d(0f64..1f64, lo..hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{:.*}", precision, v))
        .label_style(theme.tick_font())
        .draw()?;

    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let y0 = lo + i as f64 * step;
        Rectangle::new(
            [(0.0, y0), (1.0, y0 + step)],
            heatmap.color_of(y0 + step / 2.0).filled(),
        )
    }))?;

    Ok(())
}
