//! TrendConfig rule kind: direction threshold, critical-trend rates,
//! trajectory ratio and critical-period thresholds.

use serde::{Deserialize, Serialize};

use envsafe_core::TrendParams;

use crate::schema::CommonMetadata;

/// Top-level TrendConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrendConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub spec: TrendParams,
}

impl TrendConfigRule {
    pub fn compile(&self) -> TrendParams {
        self.spec.clone()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.spec.direction_threshold < 0.0 {
            return Err("direction_threshold must not be negative".to_string());
        }
        if self.spec.trajectory_ratio < 1.0 {
            return Err(format!(
                "trajectory_ratio below 1.0 lets both sides win: {}",
                self.spec.trajectory_ratio
            ));
        }
        let periods = &self.spec.critical_periods;
        if periods.critical > periods.period {
            return Err(format!(
                "critical_periods.critical ({}) exceeds critical_periods.period ({})",
                periods.critical, periods.period
            ));
        }
        Ok(())
    }
}
