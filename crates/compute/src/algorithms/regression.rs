//! Closed-form least-squares helpers over evenly spaced series.
//!
//! Every function treats the sample index `0..n` as the regressor and is
//! total: degenerate inputs (too few samples, zero variance) yield 0.

use std::f64::consts::PI;

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Returns 0.0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Centered index `i - mean(index)` for each sample.
fn centered_index(n: usize) -> impl Iterator<Item = f64> {
    let center = (n as f64 - 1.0) / 2.0;
    (0..n).map(move |i| i as f64 - center)
}

/// Slope of the degree-1 OLS fit of `values` against their index.
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let y_mean = mean(values);
    let (sxy, sxx) = centered_index(n)
        .zip(values)
        .fold((0.0, 0.0), |(sxy, sxx), (u, y)| (sxy + u * (y - y_mean), sxx + u * u));
    if sxx <= f64::EPSILON {
        return 0.0;
    }
    sxy / sxx
}

/// Leading (quadratic) coefficient of the degree-2 OLS fit against the index.
///
/// The index is evenly spaced, so after centering the odd moments vanish and
/// the normal equations for the quadratic term decouple from the linear one.
/// Returns 0.0 for fewer than three samples.
pub fn quadratic_leading(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let (mut s2, mut s4, mut sy, mut su2y) = (0.0, 0.0, 0.0, 0.0);
    for (u, y) in centered_index(n).zip(values) {
        let u2 = u * u;
        s2 += u2;
        s4 += u2 * u2;
        sy += y;
        su2y += u2 * y;
    }
    let denom = nf * s4 - s2 * s2;
    if denom.abs() <= f64::EPSILON {
        return 0.0;
    }
    (nf * su2y - s2 * sy) / denom
}

/// Pearson correlation between the index and `values`.
///
/// Returns 0.0 for fewer than two samples or a constant series.
pub fn pearson(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let y_mean = mean(values);
    let (sxy, sxx, syy) = centered_index(n).zip(values).fold(
        (0.0, 0.0, 0.0),
        |(sxy, sxx, syy), (u, y)| {
            let dy = y - y_mean;
            (sxy + u * dy, sxx + u * u, syy + dy * dy)
        },
    );
    let denom = (sxx * syy).sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Standard deviation of a sinusoid with the given period whose amplitude is
/// `scale` times the series' own standard deviation, sampled at the series'
/// indices. A yearly-seasonality heuristic, not a spectral fit.
pub fn seasonal_amplitude(values: &[f64], period: f64, scale: f64) -> f64 {
    if values.is_empty() || period <= 0.0 {
        return 0.0;
    }
    let amplitude = std_dev(values) * scale;
    let pattern: Vec<f64> = (0..values.len())
        .map(|i| (2.0 * PI * i as f64 / period).sin() * amplitude)
        .collect();
    std_dev(&pattern)
}
