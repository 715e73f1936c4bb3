//! ScoringConfig rule kind: composite weights, absent-metric defaults,
//! time decay, risk banding and factor thresholds of the safety scorer.

use serde::{Deserialize, Serialize};

use envsafe_core::ScoringParams;

use crate::schema::CommonMetadata;

/// Top-level ScoringConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub spec: ScoringParams,
}

impl ScoringConfigRule {
    pub fn compile(&self) -> ScoringParams {
        self.spec.clone()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some((metric, w)) = self.spec.weights.iter().find(|(_, w)| **w < 0.0) {
            return Err(format!("weight for {} is negative: {}", metric, w));
        }
        let total: f64 = self.spec.weights.values().sum();
        if total > 1.0 + 1e-9 {
            return Err(format!("weights sum to {}, which would push scores above 100", total));
        }
        let bands = &self.spec.risk_bands;
        if !(bands.low > bands.medium && bands.medium > bands.high) {
            return Err(format!(
                "risk bands must be descending (low > medium > high), got {} / {} / {}",
                bands.low, bands.medium, bands.high
            ));
        }
        let decay = &self.spec.time_decay;
        if !(0.0..=1.0).contains(&decay.floor) {
            return Err(format!("time_decay.floor must be within [0, 1], got {}", decay.floor));
        }
        if decay.per_month < 0.0 {
            return Err(format!(
                "time_decay.per_month must not be negative, got {}",
                decay.per_month
            ));
        }
        Ok(())
    }
}
