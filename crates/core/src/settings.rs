//! Reference tables and tunable parameters of the forecasting engine.
//!
//! Every struct carries the built-in values in its `Default` impl. The
//! `envsafe-rules` crate deserializes YAML documents straight into these
//! types to override them; a document may set any subset of fields.
//! Per-metric tables are overlaid entry by entry, so a document listing one
//! metric leaves the built-in entries of every other metric in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::metric::Metric;

// ── Shared building blocks ────────────────────────────────────

/// Closed interval every produced value of a metric must lie in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Confidence that decays linearly with the horizon down to a floor:
/// `max(floor, start - per_month * h)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceDecay {
    pub start: f64,
    pub per_month: f64,
    pub floor: f64,
}

impl ConfidenceDecay {
    pub fn at(&self, months_ahead: u32) -> f64 {
        (self.start - self.per_month * f64::from(months_ahead)).max(self.floor)
    }
}

fn metric_table(entries: &[(Metric, f64)]) -> BTreeMap<Metric, f64> {
    entries.iter().copied().collect()
}

/// Deserialize a per-metric table as overrides on top of `base`.
fn overlay<'de, D, V>(
    deserializer: D,
    mut base: BTreeMap<Metric, V>,
) -> Result<BTreeMap<Metric, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    base.extend(BTreeMap::<Metric, V>::deserialize(deserializer)?);
    Ok(base)
}

fn overlay_bounds<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Metric, Bounds>, D::Error> {
    overlay(d, ForecastParams::default().bounds)
}

fn overlay_climate<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Metric, f64>, D::Error> {
    overlay(d, ForecastParams::default().climate_acceleration)
}

fn overlay_fallback<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Metric, f64>, D::Error> {
    overlay(d, ForecastParams::default().fallback_trend_rates)
}

fn overlay_weights<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Metric, f64>, D::Error> {
    overlay(d, ScoringParams::default().weights)
}

fn overlay_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Metric, f64>, D::Error> {
    overlay(d, ScoringParams::default().defaults)
}

/// Countries merge per metric; a new country code starts from an empty table.
fn overlay_countries<'de, D>(d: D) -> Result<BTreeMap<String, BTreeMap<Metric, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut merged = ForecastParams::default().country_factors;
    for (code, table) in BTreeMap::<String, BTreeMap<Metric, f64>>::deserialize(d)? {
        merged.entry(code).or_default().extend(table);
    }
    Ok(merged)
}

// ── Forecasting ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastParams {
    /// Realistic value range per metric. Metrics without an entry pass through unclamped.
    #[serde(deserialize_with = "overlay_bounds")]
    pub bounds: BTreeMap<Metric, Bounds>,
    /// Additive secular drift per month.
    #[serde(deserialize_with = "overlay_climate")]
    pub climate_acceleration: BTreeMap<Metric, f64>,
    /// Per-month trend used when no model was trained for a metric.
    #[serde(deserialize_with = "overlay_fallback")]
    pub fallback_trend_rates: BTreeMap<Metric, f64>,
    /// Country code → metric → multiplier.
    #[serde(deserialize_with = "overlay_countries")]
    pub country_factors: BTreeMap<String, BTreeMap<Metric, f64>>,
    /// Per-metric confidence on the trained-model path.
    pub model_confidence: ConfidenceDecay,
    /// Per-metric confidence on the fallback path.
    pub fallback_confidence: f64,
    /// Overall confidence attached to each prediction step.
    pub overall_confidence: ConfidenceDecay,
    /// Period (in steps) of the seasonal sinusoid.
    pub seasonal_period: f64,
    /// Share of the series' standard deviation used as seasonal amplitude.
    pub seasonal_scale: f64,
    /// Calendar days per horizon step when dating predictions.
    pub days_per_month: i64,
    /// Horizon of the regional safety assessment.
    pub assessment_horizon_months: u32,
}

impl Default for ForecastParams {
    fn default() -> Self {
        let bounds = [
            (Metric::Temperature, Bounds::new(-50.0, 60.0)),
            (Metric::Humidity, Bounds::new(0.0, 100.0)),
            (Metric::AirQuality, Bounds::new(0.0, 500.0)),
            (Metric::Deforestation, Bounds::new(0.0, 100.0)),
            (Metric::CarbonEmission, Bounds::new(0.0, 200.0)),
            (Metric::WaterQuality, Bounds::new(0.0, 100.0)),
            (Metric::Biodiversity, Bounds::new(0.0, 100.0)),
        ]
        .into_iter()
        .collect();

        let country_factors = [
            (
                "BD",
                metric_table(&[
                    (Metric::Temperature, 1.1),
                    (Metric::Humidity, 1.2),
                    (Metric::AirQuality, 1.3),
                    (Metric::Deforestation, 0.8),
                    (Metric::WaterQuality, 0.7),
                ]),
            ),
            (
                "US",
                metric_table(&[
                    (Metric::Temperature, 1.0),
                    (Metric::AirQuality, 0.9),
                    (Metric::CarbonEmission, 1.2),
                ]),
            ),
            (
                "BR",
                metric_table(&[(Metric::Deforestation, 1.5), (Metric::Biodiversity, 1.3)]),
            ),
            (
                "IN",
                metric_table(&[(Metric::AirQuality, 1.4), (Metric::WaterQuality, 0.8)]),
            ),
        ]
        .into_iter()
        .map(|(code, table)| (code.to_string(), table))
        .collect();

        Self {
            bounds,
            climate_acceleration: metric_table(&[
                (Metric::Temperature, 0.02),
                (Metric::Deforestation, 0.015),
            ]),
            fallback_trend_rates: metric_table(&[
                (Metric::Temperature, 0.02),
                (Metric::Humidity, 0.1),
                (Metric::AirQuality, 0.5),
                (Metric::Deforestation, 0.1),
                (Metric::CarbonEmission, 0.3),
                (Metric::WaterQuality, -0.2),
                (Metric::Biodiversity, -0.15),
            ]),
            country_factors,
            model_confidence: ConfidenceDecay {
                start: 0.9,
                per_month: 0.03,
                floor: 0.4,
            },
            fallback_confidence: 0.6,
            overall_confidence: ConfidenceDecay {
                start: 0.9,
                per_month: 0.05,
                floor: 0.3,
            },
            seasonal_period: 12.0,
            seasonal_scale: 0.1,
            days_per_month: 30,
            assessment_horizon_months: 24,
        }
    }
}

impl ForecastParams {
    pub fn bounds_for(&self, metric: Metric) -> Option<Bounds> {
        self.bounds.get(&metric).copied()
    }

    /// Clamp into the metric's bounds, or pass through when none are declared.
    pub fn clamp(&self, metric: Option<Metric>, value: f64) -> f64 {
        match metric.and_then(|m| self.bounds_for(m)) {
            Some(bounds) => bounds.clamp(value),
            None => value,
        }
    }

    pub fn climate_rate(&self, metric: Metric) -> f64 {
        self.climate_acceleration.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn fallback_rate(&self, metric: Option<Metric>) -> f64 {
        metric
            .and_then(|m| self.fallback_trend_rates.get(&m).copied())
            .unwrap_or(0.0)
    }

    /// Multiplier for `metric` in `country`; 1.0 for unknown countries or metrics.
    pub fn country_factor(&self, country: &str, metric: Option<Metric>) -> f64 {
        metric
            .and_then(|m| self.country_factors.get(country)?.get(&m).copied())
            .unwrap_or(1.0)
    }
}

// ── Safety scoring ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeDecay {
    pub per_month: f64,
    pub floor: f64,
}

impl TimeDecay {
    pub fn factor(&self, months_ahead: u32) -> f64 {
        (1.0 - self.per_month * f64::from(months_ahead)).max(self.floor)
    }
}

/// Lower score boundaries of the risk levels (score ≥ bound).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskBands {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Thresholds carried by the registry's safety-composite entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeThresholds {
    pub critical: f64,
    pub high_risk: f64,
    pub medium_risk: f64,
    pub low_risk: f64,
}

/// Current-condition thresholds for risk and protective factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionThresholds {
    pub air_quality_risk: f64,
    pub air_quality_protective: f64,
    pub deforestation_risk: f64,
    pub water_quality_risk: f64,
    pub water_quality_protective: f64,
}

/// Thresholds flagging risk factors on predicted values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRiskThresholds {
    pub extreme_heat: f64,
    pub hazardous_air_quality: f64,
    pub severe_deforestation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimateImpactParams {
    pub temperature_baseline: f64,
    pub temperature_span: f64,
    pub temperature_weight: f64,
    pub carbon_scale: f64,
    pub carbon_weight: f64,
    pub deforestation_scale: f64,
    pub deforestation_weight: f64,
    /// Impact above this is `high`.
    pub high: f64,
    /// Impact above this is `medium`.
    pub medium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendationThresholds {
    pub air_quality_advisory: f64,
    pub resilience_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringParams {
    /// Composite weights. Metrics without a weight never contribute.
    #[serde(deserialize_with = "overlay_weights")]
    pub weights: BTreeMap<Metric, f64>,
    /// Value assumed for a metric the caller did not supply.
    #[serde(deserialize_with = "overlay_defaults")]
    pub defaults: BTreeMap<Metric, f64>,
    pub time_decay: TimeDecay,
    pub risk_bands: RiskBands,
    pub composite_thresholds: CompositeThresholds,
    pub current_conditions: ConditionThresholds,
    pub prediction_risks: PredictionRiskThresholds,
    pub climate_impact: ClimateImpactParams,
    pub recommendations: RecommendationThresholds,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            weights: metric_table(&[
                (Metric::Temperature, 0.15),
                (Metric::Humidity, 0.12),
                (Metric::AirQuality, 0.25),
                (Metric::Deforestation, 0.20),
                (Metric::CarbonEmission, 0.18),
                (Metric::WaterQuality, 0.10),
            ]),
            defaults: metric_table(&[
                (Metric::Temperature, 20.0),
                (Metric::Humidity, 60.0),
                (Metric::AirQuality, 100.0),
                (Metric::Deforestation, 20.0),
                (Metric::CarbonEmission, 50.0),
                (Metric::WaterQuality, 70.0),
            ]),
            time_decay: TimeDecay {
                per_month: 0.01,
                floor: 0.7,
            },
            risk_bands: RiskBands {
                low: 80.0,
                medium: 60.0,
                high: 40.0,
            },
            composite_thresholds: CompositeThresholds {
                critical: 30.0,
                high_risk: 50.0,
                medium_risk: 70.0,
                low_risk: 85.0,
            },
            current_conditions: ConditionThresholds {
                air_quality_risk: 150.0,
                air_quality_protective: 50.0,
                deforestation_risk: 30.0,
                water_quality_risk: 40.0,
                water_quality_protective: 80.0,
            },
            prediction_risks: PredictionRiskThresholds {
                extreme_heat: 35.0,
                hazardous_air_quality: 200.0,
                severe_deforestation: 50.0,
            },
            climate_impact: ClimateImpactParams {
                temperature_baseline: 25.0,
                temperature_span: 10.0,
                temperature_weight: 0.3,
                carbon_scale: 100.0,
                carbon_weight: 0.4,
                deforestation_scale: 100.0,
                deforestation_weight: 0.3,
                high: 0.7,
                medium: 0.4,
            },
            recommendations: RecommendationThresholds {
                air_quality_advisory: 150.0,
                resilience_score: 50.0,
            },
        }
    }
}

impl ScoringParams {
    pub fn weight(&self, metric: Metric) -> Option<f64> {
        self.weights.get(&metric).copied()
    }

    /// Default for an absent metric; 0 when no default is declared.
    pub fn default_value(&self, metric: Metric) -> f64 {
        self.defaults.get(&metric).copied().unwrap_or(0.0)
    }
}

// ── Trend classification ──────────────────────────────────────

/// Per-month trend rates above which a metric is flagged as critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriticalRates {
    pub temperature: f64,
    pub air_quality: f64,
    pub deforestation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriticalPeriodThresholds {
    /// Scores below this mark a critical period.
    pub period: f64,
    /// Periods below this are `critical`, the rest `high_risk`.
    pub critical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendParams {
    /// |rate| above this is increasing/decreasing, otherwise stable.
    pub direction_threshold: f64,
    pub critical_rates: CriticalRates,
    /// One side must outnumber the other by this ratio to decide the trajectory.
    pub trajectory_ratio: f64,
    /// |slope| of the safety-score sequence above this is improving/deteriorating.
    pub safety_trend_threshold: f64,
    pub critical_periods: CriticalPeriodThresholds,
    /// Confidence reported with a regional safety assessment.
    pub assessment_confidence: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            direction_threshold: 0.1,
            critical_rates: CriticalRates {
                temperature: 0.05,
                air_quality: 1.0,
                deforestation: 0.2,
            },
            trajectory_ratio: 1.5,
            safety_trend_threshold: 0.5,
            critical_periods: CriticalPeriodThresholds {
                period: 40.0,
                critical: 30.0,
            },
            assessment_confidence: 0.82,
        }
    }
}

// ── Aggregate ─────────────────────────────────────────────────

/// Everything the engine needs besides a model registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub forecast: ForecastParams,
    pub scoring: ScoringParams,
    pub trend: TrendParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let sum: f64 = ScoringParams::default().weights.values().sum();
        assert!((sum - 1.0).abs() < 1e-10);
    }

    #[test]
    fn every_metric_has_bounds() {
        let params = ForecastParams::default();
        for metric in Metric::ALL {
            let b = params.bounds_for(metric).unwrap();
            assert!(b.min < b.max, "{metric}");
        }
    }

    #[test]
    fn country_factor_defaults_to_one() {
        let params = ForecastParams::default();
        assert_eq!(params.country_factor("BD", Some(Metric::Temperature)), 1.1);
        assert_eq!(params.country_factor("BD", Some(Metric::CarbonEmission)), 1.0);
        assert_eq!(params.country_factor("ZZ", Some(Metric::Temperature)), 1.0);
        assert_eq!(params.country_factor("BD", None), 1.0);
    }

    #[test]
    fn clamp_passes_unknown_metric_through() {
        let params = ForecastParams::default();
        assert_eq!(params.clamp(Some(Metric::Humidity), 130.0), 100.0);
        assert_eq!(params.clamp(Some(Metric::Temperature), -80.0), -50.0);
        assert_eq!(params.clamp(None, 9_999.0), 9_999.0);
    }

    #[test]
    fn only_temperature_and_deforestation_accelerate() {
        let params = ForecastParams::default();
        assert_eq!(params.climate_rate(Metric::Temperature), 0.02);
        assert_eq!(params.climate_rate(Metric::Deforestation), 0.015);
        assert_eq!(params.climate_rate(Metric::CarbonEmission), 0.0);
    }

    #[test]
    fn confidence_decay_floors() {
        let decay = ForecastParams::default().model_confidence;
        assert!((decay.at(1) - 0.87).abs() < 1e-12);
        assert_eq!(decay.at(100), 0.4);
    }

    #[test]
    fn time_decay_floors_at_seventy_percent() {
        let decay = ScoringParams::default().time_decay;
        assert_eq!(decay.factor(0), 1.0);
        assert!((decay.factor(12) - 0.88).abs() < 1e-12);
        assert_eq!(decay.factor(60), 0.7);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let params: TrendParams = serde_json::from_str(r#"{"trajectory_ratio": 2.0}"#).unwrap();
        assert_eq!(params.trajectory_ratio, 2.0);
        assert_eq!(params.direction_threshold, 0.1);
    }

    #[test]
    fn partial_tables_overlay_builtin_entries() {
        let forecast: ForecastParams = serde_json::from_str(
            r#"{"bounds": {"humidity": {"min": 0, "max": 90}},
                "country_factors": {"BD": {"carbon_emission": 1.4}, "KE": {"deforestation": 1.2}}}"#,
        )
        .unwrap();
        assert_eq!(forecast.bounds_for(Metric::Humidity), Some(Bounds::new(0.0, 90.0)));
        assert_eq!(forecast.bounds_for(Metric::Temperature), Some(Bounds::new(-50.0, 60.0)));
        assert_eq!(forecast.country_factor("BD", Some(Metric::CarbonEmission)), 1.4);
        assert_eq!(forecast.country_factor("BD", Some(Metric::Temperature)), 1.1);
        assert_eq!(forecast.country_factor("KE", Some(Metric::Deforestation)), 1.2);
        assert_eq!(forecast.climate_acceleration, ForecastParams::default().climate_acceleration);

        let scoring: ScoringParams =
            serde_json::from_str(r#"{"weights": {"air_quality": 0.2}, "defaults": {"humidity": 55}}"#)
                .unwrap();
        assert_eq!(scoring.weight(Metric::AirQuality), Some(0.2));
        assert_eq!(scoring.weight(Metric::Temperature), Some(0.15));
        assert_eq!(scoring.weights.len(), 6);
        assert_eq!(scoring.default_value(Metric::Humidity), 55.0);
        assert_eq!(scoring.default_value(Metric::WaterQuality), 70.0);
    }
}
