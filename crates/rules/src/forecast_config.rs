//! ForecastConfig rule kind: value bounds, climate acceleration, fallback
//! trend rates, country factors and confidence decay for the forecaster.

use serde::{Deserialize, Serialize};

use envsafe_core::ForecastParams;

use crate::schema::CommonMetadata;

/// Top-level ForecastConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    /// Fields left out keep their built-in values.
    #[serde(default)]
    pub spec: ForecastParams,
}

impl ForecastConfigRule {
    pub fn compile(&self) -> ForecastParams {
        self.spec.clone()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (metric, bounds) in &self.spec.bounds {
            if bounds.min > bounds.max {
                return Err(format!(
                    "bounds for {} are inverted: min {} > max {}",
                    metric, bounds.min, bounds.max
                ));
            }
        }
        for (name, decay) in [
            ("model_confidence", &self.spec.model_confidence),
            ("overall_confidence", &self.spec.overall_confidence),
        ] {
            if decay.per_month < 0.0 {
                return Err(format!("{} must not increase with the horizon", name));
            }
            if decay.floor > decay.start {
                return Err(format!(
                    "{}.floor ({}) exceeds {}.start ({})",
                    name, decay.floor, name, decay.start
                ));
            }
        }
        if self.spec.seasonal_period <= 0.0 {
            return Err("seasonal_period must be positive".to_string());
        }
        Ok(())
    }
}
