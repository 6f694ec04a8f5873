//! Colors, fonts and sizes shared by every chart

use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};

/// Plot area fill (darkgrid style)
pub const BACKGROUND: RGBColor = RGBColor(234, 234, 242);
/// Default line color of single-series plots
pub const LINE_BLUE: RGBColor = RGBColor(31, 119, 180);

/// Colors of the four stacked time panels
pub const PANEL_COLORS: [RGBColor; 4] = [
    RGBColor(68, 1, 84),
    RGBColor(33, 145, 140),
    RGBColor(253, 231, 37),
    RGBColor(54, 84, 134),
];

const VIRIDIS: [(f64, (u8, u8, u8)); 5] = [
    (0.00, (68, 1, 84)),
    (0.25, (59, 82, 139)),
    (0.50, (33, 145, 140)),
    (0.75, (94, 201, 98)),
    (1.00, (253, 231, 37)),
];

const COOLWARM: [(f64, (u8, u8, u8)); 3] = [
    (0.0, (59, 76, 192)),
    (0.5, (221, 221, 221)),
    (1.0, (180, 4, 38)),
];

fn interpolate(stops: &[(f64, (u8, u8, u8))], t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2));
        }
    }
    let (_, last) = stops[stops.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

/// Viridis colormap, `t` in 0..=1
pub fn viridis(t: f64) -> RGBColor {
    interpolate(&VIRIDIS, t)
}

/// Diverging blue-white-red colormap, `t` in 0..=1
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(&COOLWARM, t)
}

/// `n` evenly spaced viridis colors, endpoints excluded
pub fn viridis_palette(n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| viridis((i + 1) as f64 / (n + 1) as f64))
        .collect()
}

/// Relative luminance, used to pick readable annotation colors
pub fn is_dark(color: &RGBColor) -> bool {
    let RGBColor(r, g, b) = *color;
    let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    luminance < 140.0
}

/// Point-based sizing converted to pixels at the render DPI
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    dpi: u32,
}

impl Theme {
    pub fn new(dpi: u32) -> Self {
        Self { dpi: dpi.max(1) }
    }

    /// Pixel size of a figure given in inches
    pub fn figure_size(&self, (width_in, height_in): (f64, f64)) -> (u32, u32) {
        let px = |inches: f64| ((inches * self.dpi as f64).round() as u32).max(1);
        (px(width_in), px(height_in))
    }

    /// Convert typographic points to pixels
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn px_u32(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(points), FontStyle::Normal)
    }

    pub fn title_font(&self) -> FontDesc<'static> {
        self.font(15.0)
    }

    pub fn panel_title_font(&self) -> FontDesc<'static> {
        self.font(14.0)
    }

    pub fn axis_font(&self) -> FontDesc<'static> {
        self.font(12.0)
    }

    pub fn tick_font(&self) -> FontDesc<'static> {
        self.font(10.0)
    }

    pub fn margin(&self) -> u32 {
        self.px_u32(10.0)
    }

    pub fn label_area(&self) -> u32 {
        self.px_u32(40.0)
    }

    pub fn line_width(&self) -> u32 {
        self.px_u32(1.5)
    }

    pub fn marker_radius(&self) -> u32 {
        self.px_u32(3.0)
    }
}
