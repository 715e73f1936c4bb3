//! The `Predictor` engine: training, forecasting, trend analysis and
//! regional safety assessment.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use envsafe_core::{
    check_history, has_metric, series, EngineSettings, HistoricalRecord, Metric, MetricValues,
    Result,
};

use crate::estimator::{fit_confidence, fit_trend_model, summarize_trend, TrendSummary};
use crate::forecaster::MetricForecaster;
use crate::recommend::{interventions, safety_recommendations};
use crate::registry::{ModelRegistry, SafetyComposite, TrainingOutcome, TrainingSummary};
use crate::scorer::{ClimateImpact, RiskLevel, SafetyScorer};
use crate::trajectory::{
    critical_periods, critical_trends, overall_trajectory, safety_trend, CriticalPeriod,
    CriticalTrend, SafetyTrend, Trajectory,
};

/// Registry name of the safety composite entry in training summaries.
pub const SAFETY_MODEL_NAME: &str = "safety_predictor";

/// One month-ahead step of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub month_ahead: u32,
    /// Forecast value per input metric, in input order.
    pub metrics: MetricValues,
    pub safety_score: f64,
    /// Overall confidence of this step.
    pub confidence: f64,
    /// Per-metric forecast confidence, in input order.
    pub confidence_breakdown: MetricValues,
    pub risk_factors: Vec<String>,
    pub climate_impact: ClimateImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trends: BTreeMap<Metric, TrendSummary>,
    pub critical_trends: Vec<CriticalTrend>,
    pub overall_trajectory: Trajectory,
    pub intervention_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyAssessment {
    pub country: String,
    pub current_safety_score: f64,
    pub current_risk_level: RiskLevel,
    pub future_safety_trend: SafetyTrend,
    pub critical_periods: Vec<CriticalPeriod>,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
}

/// Stateless engine over a fixed set of parameters.
///
/// Models live in the [`ModelRegistry`] returned by [`Predictor::train`];
/// every other entry point takes the registry by reference.
#[derive(Debug, Clone, Default)]
pub struct Predictor {
    settings: EngineSettings,
}

impl Predictor {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn scorer(&self) -> SafetyScorer<'_> {
        SafetyScorer::new(&self.settings.scoring)
    }

    /// Fit a trend model for every known metric present in `history`.
    ///
    /// Empty history is a caller error: synthetic data, if wanted, must be
    /// supplied by the caller. Non-finite samples are rejected.
    pub fn train(&self, history: &[HistoricalRecord]) -> Result<TrainingOutcome> {
        check_history(history)?;
        let start = Instant::now();

        let mut trend_models = BTreeMap::new();
        let mut confidences = Vec::new();
        for metric in Metric::ALL {
            if !has_metric(history, metric) {
                continue;
            }
            let values = series(history, metric);
            let model = fit_trend_model(&values, &self.settings.forecast);
            let confidence = fit_confidence(&values);
            debug!(
                %metric,
                samples = values.len(),
                trend_rate = model.trend_rate,
                confidence,
                "trained trend model"
            );
            trend_models.insert(metric, model);
            confidences.push(confidence);
        }

        let registry = ModelRegistry::new(
            trend_models,
            SafetyComposite::from_params(&self.settings.scoring),
        );

        let overall_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };
        let mut metrics: Vec<String> = registry
            .trained_metrics()
            .iter()
            .map(|m| m.to_string())
            .collect();
        metrics.push(SAFETY_MODEL_NAME.to_string());

        let summary = TrainingSummary {
            models_trained: registry.model_count(),
            metrics,
            overall_confidence,
        };

        info!(
            records = history.len(),
            models = summary.models_trained,
            overall_confidence,
            "training complete in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(TrainingOutcome { registry, summary })
    }

    /// Forecast `horizon` monthly steps starting from today.
    pub fn forecast(
        &self,
        registry: &ModelRegistry,
        current: &MetricValues,
        country: &str,
        horizon: u32,
    ) -> Vec<Prediction> {
        self.forecast_from(registry, current, country, horizon, Local::now().date_naive())
    }

    /// Forecast `horizon` monthly steps with dates relative to `base_date`.
    ///
    /// Steps are returned in increasing horizon order; a zero horizon yields
    /// an empty forecast.
    pub fn forecast_from(
        &self,
        registry: &ModelRegistry,
        current: &MetricValues,
        country: &str,
        horizon: u32,
        base_date: NaiveDate,
    ) -> Vec<Prediction> {
        info!(country, horizon, metrics = current.len(), "generating forecast");

        let forecaster = MetricForecaster::new(&self.settings.forecast);
        let scorer = self.scorer();

        (1..=horizon)
            .map(|month| {
                let mut metrics = MetricValues::new();
                let mut confidence_breakdown = MetricValues::new();
                for (key, value) in current.iter() {
                    let forecast = forecaster.predict(registry, key, value, month, country);
                    metrics.insert(key.clone(), forecast.value);
                    confidence_breakdown.insert(key.clone(), forecast.confidence);
                }

                let days = self.settings.forecast.days_per_month.max(0) as u64 * u64::from(month);
                Prediction {
                    date: base_date
                        .checked_add_days(Days::new(days))
                        .unwrap_or(NaiveDate::MAX),
                    month_ahead: month,
                    safety_score: scorer.score(&metrics, month),
                    confidence: self.settings.forecast.overall_confidence.at(month),
                    risk_factors: scorer.prediction_risk_factors(&metrics),
                    climate_impact: scorer.climate_impact(&metrics),
                    metrics,
                    confidence_breakdown,
                }
            })
            .collect()
    }

    /// Summarize every known metric present in `history` and classify the
    /// overall direction.
    pub fn analyze_trends(&self, history: &[HistoricalRecord]) -> Result<TrendAnalysis> {
        check_history(history)?;
        let params = &self.settings.trend;

        let trends: BTreeMap<Metric, TrendSummary> = Metric::ALL
            .into_iter()
            .filter(|&metric| has_metric(history, metric))
            .map(|metric| (metric, summarize_trend(&series(history, metric), params)))
            .collect();

        let critical = critical_trends(&trends, params);
        let trajectory = overall_trajectory(&trends, params);
        info!(
            metrics = trends.len(),
            critical = critical.len(),
            trajectory = ?trajectory,
            "trend analysis complete"
        );

        Ok(TrendAnalysis {
            intervention_recommendations: interventions(&critical),
            trends,
            critical_trends: critical,
            overall_trajectory: trajectory,
        })
    }

    /// Current safety plus a long-range outlook for `country`.
    pub fn assess_regional_safety(
        &self,
        registry: &ModelRegistry,
        current: &MetricValues,
        country: &str,
    ) -> SafetyAssessment {
        self.assess_regional_safety_from(registry, current, country, Local::now().date_naive())
    }

    pub fn assess_regional_safety_from(
        &self,
        registry: &ModelRegistry,
        current: &MetricValues,
        country: &str,
        base_date: NaiveDate,
    ) -> SafetyAssessment {
        let scorer = self.scorer();
        let now = scorer.current_safety(current);

        let predictions = self.forecast_from(
            registry,
            current,
            country,
            self.settings.forecast.assessment_horizon_months,
            base_date,
        );
        let scores: Vec<f64> = predictions.iter().map(|p| p.safety_score).collect();

        let params = &self.settings.trend;
        let periods = critical_periods(&scores, params);
        let recommendations =
            safety_recommendations(current, &scores, country, &self.settings.scoring);

        info!(
            country,
            score = now.score,
            risk_level = ?now.risk_level,
            critical_periods = periods.len(),
            "regional safety assessed"
        );

        SafetyAssessment {
            country: country.to_string(),
            current_safety_score: now.score,
            current_risk_level: now.risk_level,
            future_safety_trend: safety_trend(&scores, params),
            critical_periods: periods,
            risk_factors: now.risk_factors,
            protective_factors: now.protective_factors,
            recommendations,
            confidence: params.assessment_confidence,
        }
    }
}
