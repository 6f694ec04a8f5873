//! Category bar charts

use super::theme::{self, Theme};
use super::{category_label, category_range, value_ceiling, Canvas};
use anyhow::Result;
use plotters::prelude::*;

/// Text of a bar chart
pub struct BarLabels<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// Ranked category bar charts
pub struct BarPlotter;

impl BarPlotter {
    /// Draw one bar per `(name, value)` in the given order.
    ///
    /// NaN values keep their slot on the axis but draw no bar.
    pub fn draw(
        area: &Canvas,
        theme: &Theme,
        labels: &BarLabels,
        bars: &[(String, f64)],
    ) -> Result<()> {
        let names: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
        let colors = theme::viridis_palette(bars.len());
        let y_max = value_ceiling(bars.iter().map(|(_, v)| *v));

        let mut chart = ChartBuilder::on(area)
            .caption(labels.title, theme.title_font())
            .margin(theme.margin())
            .x_label_area_size(theme.label_area())
            .y_label_area_size(theme.label_area() * 2)
            .build_cartesian_2d(category_range(bars.len()), 0f64..y_max)?;

        chart.plotting_area().fill(&theme::BACKGROUND)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(WHITE.stroke_width(1))
            .light_line_style(&WHITE.mix(0.5))
            .x_labels(bars.len().max(1))
            .x_label_formatter(&|x| category_label(&names, *x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .label_style(theme.tick_font())
            .axis_desc_style(theme.axis_font())
            .draw()?;

        chart.draw_series(
            bars.iter()
                .enumerate()
                .filter(|(_, (_, value))| value.is_finite())
                .map(|(idx, (_, value))| {
                    let x = idx as f64;
                    Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value)], colors[idx].filled())
                }),
        )?;

        Ok(())
    }
}
