//! Box plots of a value per category

use super::bar::BarLabels;
use super::theme::{self, Theme};
use super::{category_label, category_range, Canvas};
use crate::aggregate::Quartiles;
use anyhow::Result;
use plotters::prelude::*;
use std::ops::Range;

const BOX_HALF_WIDTH: f64 = 0.4;
const CAP_HALF_WIDTH: f64 = 0.2;

fn value_range(groups: &[(String, Option<Quartiles>)]) -> Range<f64> {
    let (lo, hi) = groups
        .iter()
        .filter_map(|(_, q)| q.as_ref())
        .map(|q| q.extent())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Box plots per category
pub struct BoxPlotter;

impl BoxPlotter {
    /// Draw one box per category; categories without finite values stay empty
    pub fn draw(
        area: &Canvas,
        theme: &Theme,
        labels: &BarLabels,
        groups: &[(String, Option<Quartiles>)],
    ) -> Result<()> {
        let names: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
        let colors = theme::viridis_palette(groups.len());
        let line = theme.line_width();

        let mut chart = ChartBuilder::on(area)
            .caption(labels.title, theme.title_font())
            .margin(theme.margin())
            .x_label_area_size(theme.label_area())
            .y_label_area_size(theme.label_area() * 2)
            .build_cartesian_2d(category_range(groups.len()), value_range(groups))?;

        chart.plotting_area().fill(&theme::BACKGROUND)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(WHITE.stroke_width(1))
            .light_line_style(&WHITE.mix(0.5))
            .x_labels(groups.len().max(1))
            .x_label_formatter(&|x| category_label(&names, *x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .label_style(theme.tick_font())
            .axis_desc_style(theme.axis_font())
            .draw()?;

        let outline = BLACK.mix(0.8).stroke_width(line);

        for (idx, (_, quartiles)) in groups.iter().enumerate() {
            let Some(q) = quartiles else {
                continue;
            };
            let x = idx as f64;
            let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, q.q1), (right, q.q3)],
                colors[idx].filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, q.q1), (right, q.q3)],
                outline,
            )))?;

            chart.draw_series(vec![
                PathElement::new(vec![(left, q.median), (right, q.median)], outline),
                PathElement::new(vec![(x, q.q3), (x, q.upper_whisker)], outline),
                PathElement::new(vec![(x, q.q1), (x, q.lower_whisker)], outline),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, q.upper_whisker),
                        (x + CAP_HALF_WIDTH, q.upper_whisker),
                    ],
                    outline,
                ),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, q.lower_whisker),
                        (x + CAP_HALF_WIDTH, q.lower_whisker),
                    ],
                    outline,
                ),
            ])?;

            chart.draw_series(q.outliers.iter().map(|&v| {
                Circle::new((x, v), theme.marker_radius(), outline)
            }))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_covers_outliers() {
        let groups = vec![
            ("a".to_string(), Quartiles::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0])),
            ("b".to_string(), None),
        ];
        let range = value_range(&groups);
        assert!(range.start < 1.0);
        assert!(range.end > 100.0);
    }

    #[test]
    fn test_value_range_without_data() {
        assert_eq!(value_range(&[("a".to_string(), None)]), 0.0..1.0);
    }
}
