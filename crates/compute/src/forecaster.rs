//! Per-metric forecasting from a fitted trend model or the fallback table.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use envsafe_core::{ForecastParams, Metric, MetricKey};

use crate::registry::ModelRegistry;

/// Which path produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    Trained,
    Fallback,
}

/// One bounded, confidence-tagged forecast value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricForecast {
    pub value: f64,
    pub confidence: f64,
    pub source: ForecastSource,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub struct MetricForecaster<'a> {
    params: &'a ForecastParams,
}

impl<'a> MetricForecaster<'a> {
    pub fn new(params: &'a ForecastParams) -> Self {
        Self { params }
    }

    /// Forecast `key` `months_ahead` steps from `current` for `country`.
    ///
    /// Never fails: unknown metrics, countries and untrained metrics all
    /// resolve through defaults.
    pub fn predict(
        &self,
        registry: &ModelRegistry,
        key: &MetricKey,
        current: f64,
        months_ahead: u32,
        country: &str,
    ) -> MetricForecast {
        let metric = key.metric();
        let forecast = match metric.and_then(|m| registry.trend_model(m).map(|model| (m, model))) {
            Some((m, model)) => {
                let h = f64::from(months_ahead);
                let trend_effect = model.trend_rate * h;
                let seasonal_effect =
                    model.seasonal_amplitude * (2.0 * PI * h / self.params.seasonal_period).sin();
                let climate_effect = self.params.climate_rate(m) * h;
                let multiplier = self.params.country_factor(country, Some(m));

                let raw = (current + trend_effect + seasonal_effect + climate_effect) * multiplier;
                MetricForecast {
                    value: round_to(self.params.clamp(Some(m), raw), 2),
                    confidence: self.params.model_confidence.at(months_ahead),
                    source: ForecastSource::Trained,
                }
            }
            None => self.fallback(metric, current, months_ahead, country),
        };

        debug!(
            metric = %key,
            months_ahead,
            country,
            value = forecast.value,
            source = ?forecast.source,
            "metric forecast"
        );
        forecast
    }

    /// Fixed per-month drift scaled by the country multiplier.
    fn fallback(
        &self,
        metric: Option<Metric>,
        current: f64,
        months_ahead: u32,
        country: &str,
    ) -> MetricForecast {
        let rate = self.params.fallback_rate(metric);
        let multiplier = self.params.country_factor(country, metric);
        let raw = current + rate * f64::from(months_ahead) * multiplier;
        MetricForecast {
            value: round_to(self.params.clamp(metric, raw), 2),
            confidence: self.params.fallback_confidence,
            source: ForecastSource::Fallback,
        }
    }
}
