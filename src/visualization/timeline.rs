//! Charts over a time axis

use super::bar::BarLabels;
use super::theme::{self, Theme};
use super::{format_time, time_range, value_ceiling, Canvas};
use anyhow::Result;
use plotters::prelude::*;

/// A named series sharing the chart's time axis
pub struct Layer {
    pub name: String,
    pub values: Vec<f64>,
}

/// One titled panel per series, sharing the time axis
pub struct Panel {
    pub title: String,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

/// Charts sharing a time axis
pub struct TimelinePlotter;

impl TimelinePlotter {
    /// Line with markers, points ordered by time
    pub fn draw_line(
        area: &Canvas,
        theme: &Theme,
        labels: &BarLabels,
        points: &[(f64, f64)],
    ) -> Result<()> {
        let mut sorted: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|(_, y)| y.is_finite())
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let xs: Vec<f64> = sorted.iter().map(|p| p.0).collect();
        let y_max = value_ceiling(sorted.iter().map(|p| p.1));
        let line = theme.line_width();

        let mut chart = ChartBuilder::on(area)
            .caption(labels.title, theme.title_font())
            .margin(theme.margin())
            .x_label_area_size(theme.label_area())
            .y_label_area_size(theme.label_area() * 2)
            .build_cartesian_2d(time_range(&xs), 0f64..y_max)?;

        chart.plotting_area().fill(&theme::BACKGROUND)?;

        chart
            .configure_mesh()
            .bold_line_style(WHITE.stroke_width(1))
            .light_line_style(&WHITE.mix(0.5))
            .x_labels(6)
            .x_label_formatter(&format_time)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .label_style(theme.tick_font())
            .axis_desc_style(theme.axis_font())
            .draw()?;

        chart.draw_series(LineSeries::new(
            sorted.iter().copied(),
            theme::LINE_BLUE.stroke_width(line),
        ))?;
        chart.draw_series(
            sorted
                .iter()
                .map(|&p| Circle::new(p, theme.marker_radius(), theme::LINE_BLUE.filled())),
        )?;

        Ok(())
    }

    /// Stacked area of `layers` over `xs`.
    ///
    /// `y_limit` fixes the value axis (used for percentages); otherwise it fits
    /// the tallest stack. Rows where any layer is NaN leave a gap.
    pub fn draw_stacked(
        area: &Canvas,
        theme: &Theme,
        labels: &BarLabels,
        xs: &[f64],
        layers: &[Layer],
        y_limit: Option<f64>,
    ) -> Result<()> {
        let colors = theme::viridis_palette(layers.len());
        let runs = complete_runs(layers, xs.len());

        let y_max = y_limit.unwrap_or_else(|| {
            value_ceiling(
                runs.iter()
                    .flatten()
                    .map(|&i| layers.iter().map(|l| l.values[i]).sum::<f64>()),
            )
        });

        let mut chart = ChartBuilder::on(area)
            .caption(labels.title, theme.title_font())
            .margin(theme.margin())
            .x_label_area_size(theme.label_area())
            .y_label_area_size(theme.label_area() * 2)
            .build_cartesian_2d(time_range(xs), 0f64..y_max)?;

        chart.plotting_area().fill(&theme::BACKGROUND)?;

        chart
            .configure_mesh()
            .bold_line_style(WHITE.stroke_width(1))
            .light_line_style(&WHITE.mix(0.5))
            .x_labels(6)
            .x_label_formatter(&format_time)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .label_style(theme.tick_font())
            .axis_desc_style(theme.axis_font())
            .draw()?;

        let swatch = theme.px(6.0) as i32;
        let mut labelled = vec![false; layers.len()];

        for run in &runs {
            for (k, bounds) in stack_bounds(layers, run).into_iter().enumerate() {
                let mut outline: Vec<(f64, f64)> = run
                    .iter()
                    .zip(&bounds)
                    .map(|(&i, &(_, upper))| (xs[i], upper))
                    .collect();
                outline.extend(
                    run.iter()
                        .zip(&bounds)
                        .rev()
                        .map(|(&i, &(lower, _))| (xs[i], lower)),
                );

                let color = colors[k];
                let drawn = chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    color.mix(0.8).filled(),
                )))?;

                if !labelled[k] {
                    labelled[k] = true;
                    drawn
                        .label(layers[k].name.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new(
                                [(x, y - swatch), (x + 2 * swatch, y + swatch)],
                                color.filled(),
                            )
                        });
                }
            }
        }

        if labelled.iter().any(|l| *l) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(theme.axis_font())
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        Ok(())
    }

    /// Vertically stacked line-and-fill panels
    pub fn draw_panels(
        area: &Canvas,
        theme: &Theme,
        x_desc: &str,
        y_desc: &str,
        xs: &[f64],
        panels: &[Panel],
    ) -> Result<()> {
        let x_range = time_range(xs);
        let line = theme.line_width();
        let blank = |_: &f64| String::new();
        let y_formatter = |y: &f64| format!("{:.0}", y);
        let areas = area.split_evenly((panels.len().max(1), 1));

        for (idx, (panel, cell)) in panels.iter().zip(areas.iter()).enumerate() {
            let last = idx + 1 == panels.len();
            let points: Vec<(f64, f64)> = xs
                .iter()
                .copied()
                .zip(panel.values.iter().copied())
                .filter(|(_, y)| y.is_finite())
                .collect();
            let y_max = value_ceiling(points.iter().map(|p| p.1));

            let mut chart = ChartBuilder::on(cell)
                .caption(panel.title.as_str(), theme.panel_title_font())
                .margin(theme.margin())
                .x_label_area_size(if last {
                    theme.label_area()
                } else {
                    theme.margin()
                })
                .y_label_area_size(theme.label_area() * 2)
                .build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

            chart.plotting_area().fill(&theme::BACKGROUND)?;

            let x_formatter: &dyn Fn(&f64) -> String =
                if last { &format_time } else { &blank };
            let mut mesh = chart.configure_mesh();
            mesh.bold_line_style(WHITE.stroke_width(1))
                .light_line_style(&WHITE.mix(0.5))
                .x_labels(6)
                .x_label_formatter(x_formatter)
                .y_label_formatter(&y_formatter)
                .y_desc(y_desc)
                .label_style(theme.tick_font())
                .axis_desc_style(theme.axis_font());
            if last {
                mesh.x_desc(x_desc);
            }
            mesh.draw()?;

            chart.draw_series(AreaSeries::new(
                points.iter().copied(),
                0.0,
                panel.color.mix(0.3).filled(),
            ))?;
            chart.draw_series(LineSeries::new(
                points.iter().copied(),
                panel.color.stroke_width(line),
            ))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, theme.marker_radius(), panel.color.filled())),
            )?;
        }

        Ok(())
    }
}

/// Index runs where every layer has a finite value
fn complete_runs(layers: &[Layer], len: usize) -> Vec<Vec<usize>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for i in 0..len {
        if layers.iter().all(|l| l.values.get(i).is_some_and(|v| v.is_finite())) {
            current.push(i);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Lower and upper bound of each layer at each index of a run
fn stack_bounds(layers: &[Layer], run: &[usize]) -> Vec<Vec<(f64, f64)>> {
    let mut base = vec![0.0; run.len()];
    layers
        .iter()
        .map(|layer| {
            run.iter()
                .zip(base.iter_mut())
                .map(|(&i, b)| {
                    let lower = *b;
                    *b += layer.values[i];
                    (lower, *b)
                })
                .collect()
        })
        .collect()
}
