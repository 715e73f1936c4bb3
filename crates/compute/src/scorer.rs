//! Composite safety scoring, risk banding and per-step impact summaries.

use serde::Serialize;

use envsafe_core::{Metric, MetricValues, ScoringParams};

use crate::forecaster::round_to;

/// Risk classification of a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Severity of the climate impact of a predicted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateImpact {
    /// Weighted impact capped at 1.0.
    pub impact_score: f64,
    pub severity: ImpactSeverity,
    pub contributing_factors: Vec<String>,
}

/// Score and qualitative factors for present conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentSafety {
    pub score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
}

pub struct SafetyScorer<'a> {
    params: &'a ScoringParams,
}

impl<'a> SafetyScorer<'a> {
    pub fn new(params: &'a ScoringParams) -> Self {
        Self { params }
    }

    /// Map a raw metric value onto the 0–100 safety scale.
    ///
    /// Returns `None` for metrics that have no normalization (biodiversity).
    pub fn normalize(metric: Metric, value: f64) -> Option<f64> {
        let sub_score = match metric {
            Metric::Temperature => 100.0 - (value - 20.0).abs() * 2.0,
            Metric::Humidity => value,
            Metric::AirQuality => 100.0 - value / 5.0,
            Metric::Deforestation => 100.0 - value,
            Metric::CarbonEmission => 100.0 - value / 2.0,
            Metric::WaterQuality => value,
            Metric::Biodiversity => return None,
        };
        Some(sub_score.clamp(0.0, 100.0))
    }

    /// Weighted composite with time decay, rounded to one decimal.
    ///
    /// Absent metrics are scored at their configured default. Weights are
    /// not renormalized, so an unweighted or unnormalizable metric simply
    /// contributes nothing.
    pub fn score(&self, values: &MetricValues, months_ahead: u32) -> f64 {
        let weighted: f64 = Metric::ALL
            .iter()
            .filter_map(|&metric| {
                let weight = self.params.weight(metric)?;
                let value = values.get_or(metric, self.params.default_value(metric));
                Some(Self::normalize(metric, value)? * weight)
            })
            .sum();

        round_to(weighted * self.params.time_decay.factor(months_ahead), 1)
    }

    pub fn risk_level(&self, score: f64) -> RiskLevel {
        let bands = &self.params.risk_bands;
        if score >= bands.low {
            RiskLevel::Low
        } else if score >= bands.medium {
            RiskLevel::Medium
        } else if score >= bands.high {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Score present conditions and list the factors that drive them.
    ///
    /// Factors are only derived from metrics the caller actually supplied.
    /// An absent `air_quality` or `water_quality` is not read as 0 or 100,
    /// so missing inputs never produce "Good air quality" or "High water
    /// quality". The score itself still uses the configured defaults.
    pub fn current_safety(&self, values: &MetricValues) -> CurrentSafety {
        let score = self.score(values, 0);
        let t = &self.params.current_conditions;
        let mut risk_factors = Vec::new();
        let mut protective_factors = Vec::new();

        if let Some(aq) = values.get(Metric::AirQuality) {
            if aq > t.air_quality_risk {
                risk_factors.push("High air pollution levels".to_string());
            } else if aq < t.air_quality_protective {
                protective_factors.push("Good air quality".to_string());
            }
        }

        if values
            .get(Metric::Deforestation)
            .is_some_and(|d| d > t.deforestation_risk)
        {
            risk_factors.push("Significant deforestation".to_string());
        }

        if let Some(wq) = values.get(Metric::WaterQuality) {
            if wq < t.water_quality_risk {
                risk_factors.push("Poor water quality".to_string());
            } else if wq > t.water_quality_protective {
                protective_factors.push("High water quality".to_string());
            }
        }

        CurrentSafety {
            score,
            risk_level: self.risk_level(score),
            risk_factors,
            protective_factors,
        }
    }

    /// Risk factors raised by a predicted step.
    pub fn prediction_risk_factors(&self, values: &MetricValues) -> Vec<String> {
        let t = &self.params.prediction_risks;
        let mut risks = Vec::new();

        if values.get(Metric::Temperature).is_some_and(|v| v > t.extreme_heat) {
            risks.push("Extreme heat conditions".to_string());
        }
        if values
            .get(Metric::AirQuality)
            .is_some_and(|v| v > t.hazardous_air_quality)
        {
            risks.push("Hazardous air quality".to_string());
        }
        if values
            .get(Metric::Deforestation)
            .is_some_and(|v| v > t.severe_deforestation)
        {
            risks.push("Severe deforestation".to_string());
        }

        risks
    }

    /// Weighted climate-change impact of a predicted step.
    pub fn climate_impact(&self, values: &MetricValues) -> ClimateImpact {
        let p = &self.params.climate_impact;
        let value = |metric| values.get_or(metric, self.params.default_value(metric));

        let temperature = ((value(Metric::Temperature) - p.temperature_baseline)
            / p.temperature_span)
            .max(0.0);
        let carbon = value(Metric::CarbonEmission) / p.carbon_scale;
        let deforestation = value(Metric::Deforestation) / p.deforestation_scale;

        let impact = temperature * p.temperature_weight
            + carbon * p.carbon_weight
            + deforestation * p.deforestation_weight;

        let severity = if impact > p.high {
            ImpactSeverity::High
        } else if impact > p.medium {
            ImpactSeverity::Medium
        } else {
            ImpactSeverity::Low
        };

        ClimateImpact {
            impact_score: impact.min(1.0),
            severity,
            contributing_factors: vec![
                "temperature".to_string(),
                "carbon_emissions".to_string(),
                "deforestation".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, f64)]) -> MetricValues {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn normalization_per_metric() {
        assert_eq!(SafetyScorer::normalize(Metric::Temperature, 28.5), Some(83.0));
        assert_eq!(SafetyScorer::normalize(Metric::Temperature, 80.0), Some(0.0));
        assert_eq!(SafetyScorer::normalize(Metric::Humidity, 120.0), Some(100.0));
        assert_eq!(SafetyScorer::normalize(Metric::AirQuality, 120.0), Some(76.0));
        assert_eq!(SafetyScorer::normalize(Metric::AirQuality, 600.0), Some(0.0));
        assert_eq!(SafetyScorer::normalize(Metric::CarbonEmission, 65.0), Some(67.5));
        assert_eq!(SafetyScorer::normalize(Metric::WaterQuality, 55.0), Some(55.0));
        assert_eq!(SafetyScorer::normalize(Metric::Biodiversity, 60.0), None);
    }

    #[test]
    fn empty_input_scores_defaults() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);
        // 100*.15 + 60*.12 + 80*.25 + 80*.20 + 75*.18 + 70*.10 = 78.7
        assert!((scorer.score(&MetricValues::new(), 0) - 78.7).abs() < 1e-9);
    }

    #[test]
    fn time_decay_reduces_score() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);
        let v = values(&[("air_quality", 40.0)]);
        let now = scorer.score(&v, 0);
        let later = scorer.score(&v, 12);
        let far = scorer.score(&v, 120);
        assert!(later < now);
        assert!((far - round_to(now * 0.7, 1)).abs() < 0.11);
    }

    #[test]
    fn risk_bands() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);
        assert_eq!(scorer.risk_level(80.0), RiskLevel::Low);
        assert_eq!(scorer.risk_level(79.9), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(60.0), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(40.0), RiskLevel::High);
        assert_eq!(scorer.risk_level(39.9), RiskLevel::Critical);
    }

    #[test]
    fn current_factors_from_supplied_metrics() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);

        let polluted = scorer.current_safety(&values(&[
            ("air_quality", 180.0),
            ("deforestation", 35.0),
            ("water_quality", 30.0),
        ]));
        assert_eq!(
            polluted.risk_factors,
            vec![
                "High air pollution levels",
                "Significant deforestation",
                "Poor water quality"
            ]
        );
        assert!(polluted.protective_factors.is_empty());

        let clean = scorer.current_safety(&values(&[("air_quality", 30.0), ("water_quality", 90.0)]));
        assert!(clean.risk_factors.is_empty());
        assert_eq!(clean.protective_factors, vec!["Good air quality", "High water quality"]);

        let empty = scorer.current_safety(&MetricValues::new());
        assert!(empty.risk_factors.is_empty() && empty.protective_factors.is_empty());
    }

    #[test]
    fn prediction_risks_flag_extremes() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);
        let risks = scorer.prediction_risk_factors(&values(&[
            ("temperature", 36.0),
            ("air_quality", 250.0),
            ("deforestation", 20.0),
        ]));
        assert_eq!(risks, vec!["Extreme heat conditions", "Hazardous air quality"]);
    }

    #[test]
    fn climate_impact_severity() {
        let params = ScoringParams::default();
        let scorer = SafetyScorer::new(&params);

        // 0.35*0.3 + 0.65*0.4 + 0.25*0.3 = 0.44
        let impact = scorer.climate_impact(&values(&[
            ("temperature", 28.5),
            ("carbon_emission", 65.0),
            ("deforestation", 25.0),
        ]));
        assert!((impact.impact_score - 0.44).abs() < 1e-9);
        assert_eq!(impact.severity, ImpactSeverity::Medium);

        let severe = scorer.climate_impact(&values(&[
            ("temperature", 55.0),
            ("carbon_emission", 200.0),
            ("deforestation", 90.0),
        ]));
        assert_eq!(severe.impact_score, 1.0);
        assert_eq!(severe.severity, ImpactSeverity::High);
    }
}
