pub mod algorithms;
pub mod engine;
pub mod estimator;
pub mod forecaster;
pub mod recommend;
pub mod registry;
pub mod scorer;
pub mod trajectory;

pub use engine::{Prediction, Predictor, SafetyAssessment, TrendAnalysis, SAFETY_MODEL_NAME};
pub use estimator::{TrendDirection, TrendModel, TrendSummary};
pub use forecaster::{ForecastSource, MetricForecast, MetricForecaster};
pub use registry::{Model, ModelRegistry, SafetyComposite, TrainingOutcome, TrainingSummary};
pub use scorer::{ClimateImpact, CurrentSafety, ImpactSeverity, RiskLevel, SafetyScorer};
pub use trajectory::{
    CriticalPeriod, CriticalTrend, PeriodSeverity, SafetyDirection, SafetyTrend, Trajectory,
    TrendSeverity,
};
