//! Distribution summaries: quartiles, histogram bins and kernel density

const MAX_BINS: usize = 50;

fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Linear-interpolated percentile of sorted data, `p` in 0..=100
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Box plot summary with 1.5×IQR whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct Quartiles {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl Quartiles {
    /// `None` when no value is finite
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = finite_sorted(values);
        if sorted.is_empty() {
            return None;
        }

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= low_fence && **v <= high_fence);
        let lower_whisker = inside.iter().copied().fold(f64::INFINITY, f64::min).min(q1);
        let upper_whisker = inside.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest drawn value, outliers included
    pub fn extent(&self) -> (f64, f64) {
        let lo = self
            .outliers
            .iter()
            .copied()
            .fold(self.lower_whisker, f64::min);
        let hi = self
            .outliers
            .iter()
            .copied()
            .fold(self.upper_whisker, f64::max);
        (lo, hi)
    }
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite values.
    ///
    /// The bin count is the larger of the Sturges and Freedman–Diaconis
    /// estimates, capped at 50. A constant sample gets one unit-wide bin.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = finite_sorted(values);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        if max == min {
            return Some(Self {
                edges: vec![min - 0.5, max + 0.5],
                counts: vec![sorted.len()],
            });
        }

        let bins = bin_count(&sorted, max - min);
        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for &value in &sorted {
            let idx = (((value - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }
}

fn bin_count(sorted: &[f64], range: f64) -> usize {
    let n = sorted.len() as f64;
    let sturges = (n.log2().ceil() as usize + 1).max(1);

    let iqr = percentile(sorted, 75.0) - percentile(sorted, 25.0);
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let fd = if fd_width > 0.0 {
        (range / fd_width).ceil() as usize
    } else {
        0
    };

    sturges.max(fd).clamp(1, MAX_BINS)
}

/// Gaussian kernel density at each grid point, with Scott's bandwidth.
///
/// `None` for fewer than two finite values or a zero-variance sample.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let data = finite_sorted(values);
    if data.len() < 2 {
        return None;
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return None;
    }

    let bandwidth = std_dev * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    Some(
        grid.iter()
            .map(|&x| {
                let sum: f64 = data
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                sum * norm
            })
            .collect(),
    )
}
