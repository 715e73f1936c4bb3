//! Property tests for the forecasting and scoring invariants.

use std::collections::BTreeMap;

use envsafe_compute::trajectory::overall_trajectory;
use envsafe_compute::{
    ForecastSource, MetricForecaster, ModelRegistry, Predictor, SafetyScorer, Trajectory,
    TrendDirection, TrendSummary,
};
use envsafe_core::{EngineSettings, HistoricalRecord, Metric, MetricValues, TrendParams};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_metric() -> impl Strategy<Value = Metric> {
    prop::sample::select(Metric::ALL.to_vec())
}

fn arb_country() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["BD", "US", "BR", "IN", "ZZ", ""])
}

fn arb_direction() -> impl Strategy<Value = TrendDirection> {
    prop_oneof![
        Just(TrendDirection::Increasing),
        Just(TrendDirection::Decreasing),
        Just(TrendDirection::Stable),
    ]
}

/// Registry trained on a random series for `metric`, or an empty one.
fn registry_for(metric: Metric, series: &[f64]) -> ModelRegistry {
    let history: Vec<HistoricalRecord> = if series.is_empty() {
        vec![HistoricalRecord::new(MetricValues::new())]
    } else {
        series
            .iter()
            .map(|&v| HistoricalRecord::new([(metric, v)].into_iter().collect()))
            .collect()
    };
    Predictor::default().train(&history).unwrap().registry
}

fn summary(direction: TrendDirection) -> TrendSummary {
    TrendSummary {
        direction,
        rate: 0.0,
        acceleration: 0.0,
        volatility: 0.0,
        prediction_confidence: 0.0,
    }
}

fn flip(direction: TrendDirection) -> TrendDirection {
    match direction {
        TrendDirection::Increasing => TrendDirection::Decreasing,
        TrendDirection::Decreasing => TrendDirection::Increasing,
        TrendDirection::Stable => TrendDirection::Stable,
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn forecasts_stay_within_bounds(
        metric in arb_metric(),
        series in prop::collection::vec(-1_000.0f64..1_000.0, 0..30),
        current in -1_000.0f64..1_000.0,
        months in 1u32..240,
        country in arb_country(),
    ) {
        let settings = EngineSettings::default();
        let registry = registry_for(metric, &series);
        let forecaster = MetricForecaster::new(&settings.forecast);
        let bounds = settings.forecast.bounds_for(metric).unwrap();

        let f = forecaster.predict(&registry, &metric.into(), current, months, country);
        prop_assert!(bounds.contains(f.value), "{} out of {:?}", f.value, bounds);
    }

    #[test]
    fn confidence_never_increases_with_horizon(
        metric in arb_metric(),
        series in prop::collection::vec(0.0f64..100.0, 0..20),
        current in 0.0f64..100.0,
        months in 1u32..120,
        country in arb_country(),
    ) {
        let settings = EngineSettings::default();
        let registry = registry_for(metric, &series);
        let forecaster = MetricForecaster::new(&settings.forecast);

        let near = forecaster.predict(&registry, &metric.into(), current, months, country);
        let far = forecaster.predict(&registry, &metric.into(), current, months + 1, country);

        prop_assert!(far.confidence <= near.confidence);
        match near.source {
            ForecastSource::Trained => prop_assert!(near.confidence >= 0.4),
            ForecastSource::Fallback => {
                prop_assert_eq!(near.confidence, 0.6);
                prop_assert_eq!(far.confidence, 0.6);
            }
        }
    }

    #[test]
    fn safety_score_decays_and_is_capped(
        values in prop::collection::vec((arb_metric(), -500.0f64..1_000.0), 0..7),
        months in 0u32..120,
    ) {
        let settings = EngineSettings::default();
        let scorer = SafetyScorer::new(&settings.scoring);
        let values: MetricValues = values.into_iter().collect();

        let now = scorer.score(&values, months);
        let later = scorer.score(&values, months + 1);

        prop_assert!(later <= now);
        prop_assert!((0.0..=100.0).contains(&now));
    }

    #[test]
    fn linear_series_recovers_slope(
        start in -100.0f64..100.0,
        slope in prop_oneof![-5.0f64..-0.01, 0.01f64..5.0],
        len in 3usize..48,
    ) {
        let rows: Vec<HistoricalRecord> = (0..len)
            .map(|i| {
                let v = start + slope * i as f64;
                HistoricalRecord::new([(Metric::Humidity, v)].into_iter().collect())
            })
            .collect();
        let predictor = Predictor::default();

        let outcome = predictor.train(&rows).unwrap();
        let model = outcome.registry.trend_model(Metric::Humidity).unwrap();
        prop_assert!((model.trend_rate - slope).abs() < 1e-6);
        prop_assert!((outcome.summary.overall_confidence - 1.0).abs() < 1e-6);

        let analysis = predictor.analyze_trends(&rows).unwrap();
        prop_assert!((analysis.trends[&Metric::Humidity].prediction_confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn trajectory_is_symmetric_under_direction_flip(
        directions in prop::collection::vec(arb_direction(), 6),
    ) {
        // Humidity counts as beneficial both ways, so it has no mirror image.
        let metrics = [
            Metric::Temperature,
            Metric::AirQuality,
            Metric::Deforestation,
            Metric::CarbonEmission,
            Metric::WaterQuality,
            Metric::Biodiversity,
        ];
        let params = TrendParams::default();
        let trends: BTreeMap<_, _> = metrics
            .iter()
            .zip(&directions)
            .map(|(&m, &d)| (m, summary(d)))
            .collect();
        let flipped: BTreeMap<_, _> = trends
            .iter()
            .map(|(&m, s)| (m, summary(flip(s.direction))))
            .collect();

        let expected = match overall_trajectory(&trends, &params) {
            Trajectory::Deteriorating => Trajectory::Improving,
            Trajectory::Improving => Trajectory::Deteriorating,
            Trajectory::Mixed => Trajectory::Mixed,
        };
        prop_assert_eq!(overall_trajectory(&flipped, &params), expected);
    }
}
