//! Shared document header, rule kinds and the two-pass envelope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::forecast_config::ForecastConfigRule;
use crate::scoring_config::ScoringConfigRule;
use crate::trend_config::TrendConfigRule;

/// Metadata block common to every rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommonMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Discriminator read from the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    ForecastConfig,
    ScoringConfig,
    TrendConfig,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::ForecastConfig => "ForecastConfig",
            RuleKind::ScoringConfig => "ScoringConfig",
            RuleKind::TrendConfig => "TrendConfig",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ForecastConfig" => Ok(RuleKind::ForecastConfig),
            "ScoringConfig" => Ok(RuleKind::ScoringConfig),
            "TrendConfig" => Ok(RuleKind::TrendConfig),
            other => Err(format!("unknown rule kind: {}", other)),
        }
    }
}

/// A fully parsed rule document of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    Forecast(ForecastConfigRule),
    Scoring(ScoringConfigRule),
    Trend(TrendConfigRule),
}

impl RuleDocument {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::Forecast(_) => RuleKind::ForecastConfig,
            RuleDocument::Scoring(_) => RuleKind::ScoringConfig,
            RuleDocument::Trend(_) => RuleKind::TrendConfig,
        }
    }

    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::Forecast(r) => &r.metadata,
            RuleDocument::Scoring(r) => &r.metadata,
            RuleDocument::Trend(r) => &r.metadata,
        }
    }

    /// Semantic checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RuleDocument::Forecast(r) => r.validate(),
            RuleDocument::Scoring(r) => r.validate(),
            RuleDocument::Trend(r) => r.validate(),
        }
    }
}

/// Lightweight first-pass deserializer that reads only the header fields.
///
/// Used during two-pass loading: first extract `kind` to determine the
/// concrete type, then deserialize the full document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEnvelope {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    /// Remaining fields captured as raw YAML for second-pass deserialization.
    #[serde(flatten)]
    pub rest: serde_yaml::Value,
}

impl RuleEnvelope {
    pub fn rule_kind(&self) -> Result<RuleKind, String> {
        self.kind.parse()
    }

    /// Two-pass: reconstruct the full YAML and deserialize into the concrete type.
    pub fn parse_full(&self) -> Result<RuleDocument, String> {
        let kind = self.rule_kind()?;
        let yaml = serde_yaml::to_string(self).map_err(|e| e.to_string())?;
        let doc = match kind {
            RuleKind::ForecastConfig => {
                RuleDocument::Forecast(serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?)
            }
            RuleKind::ScoringConfig => {
                RuleDocument::Scoring(serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?)
            }
            RuleKind::TrendConfig => {
                RuleDocument::Trend(serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?)
            }
        };
        Ok(doc)
    }
}
