//! Trend estimation: fits a per-metric parametric summary from one
//! historical series.

use serde::{Deserialize, Serialize};

use envsafe_core::{ForecastParams, TrendParams};

use crate::algorithms::regression::{
    linear_slope, mean, pearson, quadratic_leading, seasonal_amplitude, std_dev,
};

/// Parametric summary of a metric's history. Immutable once fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// Change per step (degree-1 OLS slope).
    pub trend_rate: f64,
    /// Quadratic coefficient of the degree-2 fit; 0 for fewer than three samples.
    pub acceleration: f64,
    pub seasonal_amplitude: f64,
    /// Mean of the fitted series.
    pub base_value: f64,
    /// Standard deviation of the fitted series.
    pub volatility: f64,
}

/// Direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// `Increasing` above `threshold`, `Decreasing` below `-threshold`, else `Stable`.
    pub fn classify(rate: f64, threshold: f64) -> Self {
        if rate > threshold {
            TrendDirection::Increasing
        } else if rate < -threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

/// Trend-analysis view of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub rate: f64,
    pub acceleration: f64,
    pub volatility: f64,
    /// Squared index/value correlation; a proxy for explained variance.
    pub prediction_confidence: f64,
}

/// Fit a [`TrendModel`] from a series (oldest first).
pub fn fit_trend_model(series: &[f64], params: &ForecastParams) -> TrendModel {
    TrendModel {
        trend_rate: linear_slope(series),
        acceleration: quadratic_leading(series),
        seasonal_amplitude: seasonal_amplitude(
            series,
            params.seasonal_period,
            params.seasonal_scale,
        ),
        base_value: mean(series),
        volatility: std_dev(series),
    }
}

/// Squared Pearson correlation between step index and value.
pub fn fit_confidence(series: &[f64]) -> f64 {
    pearson(series).powi(2)
}

/// Summarize a series for trend analysis.
pub fn summarize_trend(series: &[f64], params: &TrendParams) -> TrendSummary {
    let rate = linear_slope(series);
    TrendSummary {
        direction: TrendDirection::classify(rate, params.direction_threshold),
        rate,
        acceleration: quadratic_leading(series),
        volatility: std_dev(series),
        prediction_confidence: fit_confidence(series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_series_has_exact_rate_and_full_confidence() {
        let series: Vec<f64> = (0..12).map(|i| 5.0 + 1.5 * i as f64).collect();
        let model = fit_trend_model(&series, &ForecastParams::default());
        assert!((model.trend_rate - 1.5).abs() < 1e-9);
        assert!(model.acceleration.abs() < 1e-9);
        assert!((fit_confidence(&series) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn temperature_example_rate() {
        let series = [20.0, 20.6, 21.2, 21.8];
        let model = fit_trend_model(&series, &ForecastParams::default());
        assert!((model.trend_rate - 0.6).abs() < 1e-9);
        assert!((model.base_value - 20.9).abs() < 1e-9);
        assert!(model.seasonal_amplitude >= 0.0);
    }

    #[test]
    fn single_sample_is_degenerate_not_an_error() {
        let model = fit_trend_model(&[42.0], &ForecastParams::default());
        assert_eq!(model.trend_rate, 0.0);
        assert_eq!(model.acceleration, 0.0);
        assert_eq!(model.seasonal_amplitude, 0.0);
        assert_eq!(model.base_value, 42.0);
        assert_eq!(model.volatility, 0.0);

        let summary = summarize_trend(&[42.0], &TrendParams::default());
        assert_eq!(summary.direction, TrendDirection::Stable);
        assert_eq!(summary.prediction_confidence, 0.0);
    }

    #[test]
    fn constant_series_is_stable_with_zero_confidence() {
        let summary = summarize_trend(&[7.0; 10], &TrendParams::default());
        assert_eq!(summary.rate, 0.0);
        assert_eq!(summary.direction, TrendDirection::Stable);
        assert_eq!(summary.prediction_confidence, 0.0);
    }

    #[test]
    fn direction_uses_strict_threshold() {
        assert_eq!(TrendDirection::classify(0.11, 0.1), TrendDirection::Increasing);
        assert_eq!(TrendDirection::classify(0.1, 0.1), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(-0.1, 0.1), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(-0.2, 0.1), TrendDirection::Decreasing);
    }
}
