//! Synthetic monthly history for runs without recorded data.
//!
//! Each metric follows a fixed linear drift plus Gaussian noise, so trained
//! models show plausible warming, pollution and water-quality trends.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use envsafe_core::{HistoricalRecord, Metric, MetricValues};

/// Base value, drift per month and noise standard deviation per metric.
const SHAPES: [(Metric, f64, f64, f64); 7] = [
    (Metric::Temperature, 20.0, 0.02, 3.0),
    (Metric::Humidity, 60.0, 0.0, 10.0),
    (Metric::AirQuality, 80.0, 0.5, 20.0),
    (Metric::Deforestation, 15.0, 0.1, 2.0),
    (Metric::CarbonEmission, 50.0, 0.3, 5.0),
    (Metric::WaterQuality, 70.0, -0.2, 8.0),
    (Metric::Biodiversity, 65.0, -0.15, 5.0),
];

const DAYS_PER_MONTH: u64 = 30;

/// `months` records, 30 days apart, ending one step before `until`.
///
/// The same seed always yields the same history; `None` draws from entropy.
pub fn generate(months: u32, seed: Option<u64>, until: NaiveDate) -> Vec<HistoricalRecord> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // Every noise figure in SHAPES is positive and finite.
    let noise: Vec<(Metric, f64, f64, Normal<f64>)> = SHAPES
        .iter()
        .filter_map(|&(metric, base, drift, std_dev)| {
            Some((metric, base, drift, Normal::new(0.0, std_dev).ok()?))
        })
        .collect();
    let start = until
        .checked_sub_days(Days::new(DAYS_PER_MONTH * u64::from(months)))
        .unwrap_or(NaiveDate::MIN);

    (0..months)
        .map(|i| {
            let step = f64::from(i);
            let values: MetricValues = noise
                .iter()
                .map(|(metric, base, drift, normal)| {
                    (*metric, base + drift * step + normal.sample(&mut rng))
                })
                .collect();
            let date = start
                .checked_add_days(Days::new(DAYS_PER_MONTH * u64::from(i)))
                .unwrap_or(NaiveDate::MAX);
            HistoricalRecord::with_date(date, values)
        })
        .collect()
}
