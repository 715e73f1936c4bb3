//! Read-only registry of fitted models.
//!
//! A registry is produced once by training and never mutated afterwards;
//! retraining builds a new registry that replaces the old value wholesale.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use envsafe_core::{CompositeThresholds, Metric, ScoringParams};

use crate::estimator::TrendModel;

/// Fixed weights and risk thresholds of the composite safety score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyComposite {
    pub weights: BTreeMap<Metric, f64>,
    pub thresholds: CompositeThresholds,
}

impl SafetyComposite {
    pub fn from_params(params: &ScoringParams) -> Self {
        Self {
            weights: params.weights.clone(),
            thresholds: params.composite_thresholds,
        }
    }
}

/// The two model shapes a registry holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model<'a> {
    TimeSeries { metric: Metric, model: &'a TrendModel },
    SafetyComposite(&'a SafetyComposite),
}

/// Serialized as the list of its tagged [`Model`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRegistry {
    trend_models: BTreeMap<Metric, TrendModel>,
    safety: SafetyComposite,
}

impl ModelRegistry {
    pub(crate) fn new(trend_models: BTreeMap<Metric, TrendModel>, safety: SafetyComposite) -> Self {
        Self {
            trend_models,
            safety,
        }
    }

    pub fn trend_model(&self, metric: Metric) -> Option<&TrendModel> {
        self.trend_models.get(&metric)
    }

    pub fn safety_composite(&self) -> &SafetyComposite {
        &self.safety
    }

    /// Metrics with a fitted trend model, in canonical order.
    pub fn trained_metrics(&self) -> Vec<Metric> {
        self.trend_models.keys().copied().collect()
    }

    /// Every entry as a tagged [`Model`], trend models first.
    pub fn models(&self) -> impl Iterator<Item = Model<'_>> {
        self.trend_models
            .iter()
            .map(|(metric, model)| Model::TimeSeries {
                metric: *metric,
                model,
            })
            .chain(std::iter::once(Model::SafetyComposite(&self.safety)))
    }

    /// Number of entries including the safety composite.
    pub fn model_count(&self) -> usize {
        self.trend_models.len() + 1
    }
}

impl Serialize for ModelRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.models())
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    /// Registry entries produced, the safety composite included.
    pub models_trained: usize,
    /// Names of all registry entries (`safety_predictor` last).
    pub metrics: Vec<String>,
    /// Mean explained-variance confidence over the trained series.
    pub overall_confidence: f64,
}

/// Registry plus its training summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingOutcome {
    pub registry: ModelRegistry,
    pub summary: TrainingSummary,
}
