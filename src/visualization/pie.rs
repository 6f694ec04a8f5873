//! Pie chart of shares

use super::theme::{self, Theme};
use super::Canvas;
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Radius relative to the shorter side of the drawing area
const RADIUS_RATIO: f64 = 0.36;
/// Angular resolution of the wedge outlines
const SEGMENTS_PER_TURN: f64 = 360.0;

/// A wedge from `start` to `end` radians, counter-clockwise
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub percent: f64,
}

/// Lay out wedges starting at 12 o'clock, counter-clockwise.
///
/// Non-finite and non-positive values get no wedge.
pub fn wedges(slices: &[(String, f64)]) -> Vec<Wedge> {
    let total: f64 = slices
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite() && *v > 0.0)
        .sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = FRAC_PI_2;
    slices
        .iter()
        .filter(|(_, v)| v.is_finite() && *v > 0.0)
        .map(|(name, v)| {
            let share = v / total;
            let start = angle;
            angle += share * TAU;
            Wedge {
                name: name.clone(),
                start,
                end: angle,
                percent: share * 100.0,
            }
        })
        .collect()
}

/// Pie charts of shares
pub struct PiePlotter;

impl PiePlotter {
    pub fn draw(
        area: &Canvas,
        theme: &Theme,
        title: &str,
        slices: &[(String, f64)],
    ) -> Result<()> {
        let body = area.titled(title, theme.title_font())?;
        let (width, height) = body.dim_in_pixel();
        let center = (width as f64 / 2.0, height as f64 / 2.0);
        let radius = width.min(height) as f64 * RADIUS_RATIO;

        let point = |angle: f64, r: f64| -> (i32, i32) {
            (
                (center.0 + r * angle.cos()).round() as i32,
                (center.1 - r * angle.sin()).round() as i32,
            )
        };

        let all = wedges(slices);
        let colors = theme::viridis_palette(slices.len());
        let label_font = theme.axis_font();
        let percent_font = theme.tick_font();

        for wedge in &all {
            let idx = slices
                .iter()
                .position(|(name, _)| *name == wedge.name)
                .unwrap_or(0);
            let fill = colors[idx];

            let sweep = (wedge.end - wedge.start) / TAU;
            let steps = (sweep * SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
            let mut outline = vec![point(0.0, 0.0)];
            outline.extend((0..=steps).map(|s| {
                let angle = wedge.start + (wedge.end - wedge.start) * s as f64 / steps as f64;
                point(angle, radius)
            }));

            body.draw(&Polygon::new(outline.clone(), fill.filled()))?;
            outline.push(point(0.0, 0.0));
            body.draw(&PathElement::new(outline, WHITE.stroke_width(theme.line_width())))?;

            let mid = (wedge.start + wedge.end) / 2.0;
            let h_pos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
            body.draw(&Text::new(
                wedge.name.clone(),
                point(mid, radius * 1.1),
                label_font.color(&BLACK).pos(Pos::new(h_pos, VPos::Center)),
            ))?;

            let ink = if theme::is_dark(&fill) { WHITE } else { BLACK };
            body.draw(&Text::new(
                format!("{:.1}%", wedge.percent),
                point(mid, radius * 0.6),
                percent_font
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedges_cover_full_turn() {
        let slices = vec![
            ("a".to_string(), 100.0),
            ("b".to_string(), 300.0),
            ("none".to_string(), 0.0),
            ("missing".to_string(), f64::NAN),
        ];
        let w = wedges(&slices);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].start, FRAC_PI_2);
        assert!((w[0].percent - 25.0).abs() < 1e-12);
        assert!((w[1].percent - 75.0).abs() < 1e-12);
        assert!((w[1].end - (FRAC_PI_2 + TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_wedges_empty_total() {
        assert!(wedges(&[("a".to_string(), 0.0)]).is_empty());
    }
}
