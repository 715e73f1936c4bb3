//! Classification of trend summaries and safety-score sequences.

use std::collections::BTreeMap;

use serde::Serialize;

use envsafe_core::{Metric, TrendParams};

use crate::algorithms::regression::linear_slope;
use crate::estimator::{TrendDirection, TrendSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSeverity {
    High,
    Critical,
}

/// A metric whose trend rate crossed its critical threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalTrend {
    pub metric: Metric,
    pub issue: String,
    pub severity: TrendSeverity,
    pub rate: f64,
}

/// Overall direction of the environment across all analysed metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trajectory {
    Improving,
    Deteriorating,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyDirection {
    Improving,
    Deteriorating,
    Stable,
}

/// Linear-trend reading of a safety-score sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SafetyTrend {
    InsufficientData,
    Assessed {
        trend: SafetyDirection,
        rate: f64,
        final_score: f64,
        score_change: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSeverity {
    HighRisk,
    Critical,
}

/// A horizon step whose safety score fell below the critical threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalPeriod {
    /// Zero-based position in the score sequence.
    pub index: usize,
    /// Months ahead, `index + 1`.
    pub month: u32,
    pub score: f64,
    pub severity: PeriodSeverity,
}

/// Metrics whose increase is bad news.
const HARMFUL_WHEN_RISING: [Metric; 4] = [
    Metric::Temperature,
    Metric::AirQuality,
    Metric::Deforestation,
    Metric::CarbonEmission,
];

/// Metrics whose decrease is bad news.
const HARMFUL_WHEN_FALLING: [Metric; 2] = [Metric::WaterQuality, Metric::Biodiversity];

/// Flag metrics whose rate exceeds their critical threshold, in canonical order.
pub fn critical_trends(
    trends: &BTreeMap<Metric, TrendSummary>,
    params: &TrendParams,
) -> Vec<CriticalTrend> {
    let rates = &params.critical_rates;
    trends
        .iter()
        .filter_map(|(&metric, summary)| {
            let (threshold, issue, severity) = match metric {
                Metric::Temperature => (
                    rates.temperature,
                    "Rapid temperature increase",
                    TrendSeverity::High,
                ),
                Metric::AirQuality => (
                    rates.air_quality,
                    "Deteriorating air quality",
                    TrendSeverity::High,
                ),
                Metric::Deforestation => (
                    rates.deforestation,
                    "Accelerating deforestation",
                    TrendSeverity::Critical,
                ),
                _ => return None,
            };
            (summary.rate > threshold).then(|| CriticalTrend {
                metric,
                issue: issue.to_string(),
                severity,
                rate: summary.rate,
            })
        })
        .collect()
}

/// Weigh harmful against beneficial movements across all metrics.
pub fn overall_trajectory(
    trends: &BTreeMap<Metric, TrendSummary>,
    params: &TrendParams,
) -> Trajectory {
    let mut negative = 0u32;
    let mut positive = 0u32;

    for (metric, summary) in trends {
        let harmful = match summary.direction {
            TrendDirection::Increasing => HARMFUL_WHEN_RISING.contains(metric),
            TrendDirection::Decreasing => HARMFUL_WHEN_FALLING.contains(metric),
            TrendDirection::Stable => continue,
        };
        if harmful {
            negative += 1;
        } else {
            positive += 1;
        }
    }

    let (negative, positive) = (f64::from(negative), f64::from(positive));
    if negative > positive * params.trajectory_ratio {
        Trajectory::Deteriorating
    } else if positive > negative * params.trajectory_ratio {
        Trajectory::Improving
    } else {
        Trajectory::Mixed
    }
}

pub fn safety_trend(scores: &[f64], params: &TrendParams) -> SafetyTrend {
    let (Some(&first), Some(&last)) = (scores.first(), scores.last()) else {
        return SafetyTrend::InsufficientData;
    };
    if scores.len() < 2 {
        return SafetyTrend::InsufficientData;
    }

    let rate = linear_slope(scores);
    let trend = if rate > params.safety_trend_threshold {
        SafetyDirection::Improving
    } else if rate < -params.safety_trend_threshold {
        SafetyDirection::Deteriorating
    } else {
        SafetyDirection::Stable
    };

    SafetyTrend::Assessed {
        trend,
        rate,
        final_score: last,
        score_change: last - first,
    }
}

pub fn critical_periods(scores: &[f64], params: &TrendParams) -> Vec<CriticalPeriod> {
    let thresholds = &params.critical_periods;
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, score)| score < thresholds.period)
        .map(|(index, score)| CriticalPeriod {
            index,
            month: u32::try_from(index + 1).unwrap_or(u32::MAX),
            score,
            severity: if score < thresholds.critical {
                PeriodSeverity::Critical
            } else {
                PeriodSeverity::HighRisk
            },
        })
        .collect()
}
