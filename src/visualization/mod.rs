//! Chart drawing with plotters

pub mod backend;
pub mod bar;
pub mod boxplot;
pub mod histogram;
pub mod matrix;
pub mod pie;
pub mod theme;
pub mod timeline;

pub use backend::TextSafeBackend;
pub use bar::{BarLabels, BarPlotter};
pub use boxplot::BoxPlotter;
pub use histogram::{HistogramPanel, HistogramPlotter};
pub use matrix::{Heatmap, HeatmapPlotter, Mask};
pub use pie::PiePlotter;
pub use theme::Theme;
pub use timeline::{Layer, Panel, TimelinePlotter};

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Drawing area every chart renders onto
pub type Canvas<'a> = DrawingArea<TextSafeBackend<BitMapBackend<'a>>, Shift>;

/// Create a PNG of `size` pixels at `path`, draw into it and flush it.
///
/// The drawing area is dropped before returning, so each chart starts from
/// a fresh canvas.
pub fn render_png<F>(path: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&Canvas) -> Result<()>,
{
    let root = TextSafeBackend::new(BitMapBackend::new(path, size)).into_drawing_area();
    root.fill(&WHITE)?;
    draw(&root)?;
    root.present()?;
    Ok(())
}

/// Category axis centered on integer positions `0..n`
pub fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Label for a category axis tick, empty between categories
pub fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper bound of a value axis starting at zero, with headroom
pub fn value_ceiling(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Seconds since the Unix epoch, as a plot coordinate
pub fn time_coord(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_millis() as f64 / 1000.0
}

/// X range covering all timestamps, padded when they coincide
pub fn time_range(xs: &[f64]) -> Range<f64> {
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max - min < 1e-9 {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.02;
    (min - pad)..(max + pad)
}

/// Tick label for a time coordinate
pub fn format_time(x: &f64) -> String {
    DateTime::from_timestamp_millis((x * 1000.0).round() as i64)
        .map(|dt| dt.format("%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_category_label() {
        let names = vec!["login".to_string(), "register".to_string()];
        assert_eq!(category_label(&names, 0.0), "login");
        assert_eq!(category_label(&names, 1.0000000001), "register");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }

    #[test]
    fn test_value_ceiling() {
        assert_eq!(value_ceiling(vec![10.0, f64::NAN, 5.0]), 11.0);
        assert_eq!(value_ceiling(vec![f64::NAN]), 1.0);
        assert_eq!(value_ceiling(Vec::new()), 1.0);
    }

    #[test]
    fn test_time_roundtrip_label() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(format_time(&time_coord(&ts)), "05-06 07:08:09");
    }

    #[test]
    fn test_time_range_pads_single_point() {
        let range = time_range(&[100.0, 100.0]);
        assert_eq!(range, 99.0..101.0);
    }
}
