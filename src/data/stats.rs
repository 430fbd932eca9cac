use std::cmp::Ordering;
use std::f64::consts::PI;

use super::model::Grade;

// ---------------------------------------------------------------------------
// Central tendency / spread
// ---------------------------------------------------------------------------

/// Arithmetic mean of the present values. `None` for an empty (or all-missing)
/// input so callers can skip instead of propagating NaN.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// 1-based fractional ranks with ties averaged.
///
/// Indices are stable-sorted by value, then each run of equal values gets the
/// mean of the positions it spans. `[10, 20, 20, 30]` → `[1, 2.5, 2.5, 4]`.
pub fn fractional_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len()
            && values[order[end]].total_cmp(&values[order[start]]) == Ordering::Equal
        {
            end += 1;
        }
        // positions start+1 ..= end, averaged
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Fractional rank of each value expressed as a percentage of the set size
/// (`rank / n * 100`). When all `n` values tie, each gets `(n + 1) / (2n) * 100`,
/// e.g. 62.5 for four values; this is not 50.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    fractional_ranks(values)
        .into_iter()
        .map(|r| r / n * 100.0)
        .collect()
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// Converts an average score into a letter grade.
///
/// | Range  | Grade |
/// |--------|-------|
/// | >= 85  | A     |
/// | >= 70  | B     |
/// | >= 50  | C     |
/// | >= 35  | D     |
/// | < 35   | F     |
pub fn grade_for(average: f64) -> Grade {
    match average {
        a if a >= 85.0 => Grade::A,
        a if a >= 70.0 => Grade::B,
        a if a >= 50.0 => Grade::C,
        a if a >= 35.0 => Grade::D,
        _ => Grade::F,
    }
}

// ---------------------------------------------------------------------------
// Distribution shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over `[min, max]`. The last bin is closed on the
/// right. A single distinct value gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth
/// (`std * n^(-1/5)`), evaluated at `points` evenly spaced x over the data
/// range. Empty when the values have no spread.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let Some(std) = sample_std_dev(values) else {
        return Vec::new();
    };
    if std <= 0.0 || points < 2 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let bw = std * n.powf(-0.2);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n * bw * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                .sum();
            [x, density * norm]
        })
        .collect()
}
