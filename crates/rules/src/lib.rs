//! YAML configuration documents for the forecasting engine.
//!
//! This crate provides:
//! - `ForecastConfig`, `ScoringConfig` and `TrendConfig` rule kinds that
//!   override the built-in parameters of `envsafe-core`
//! - A filesystem loader that collects one document per kind into a [`RuleSet`]

pub mod forecast_config;
pub mod loader;
pub mod schema;
pub mod scoring_config;
pub mod trend_config;

pub use loader::{load_rules_dir, LoadResult, LoadStatus, RuleError, RuleLoader, RuleSet};
pub use schema::{CommonMetadata, RuleDocument, RuleKind};
