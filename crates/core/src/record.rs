use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EnvSafeError, Result};
use crate::metric::{Metric, MetricValues};

/// An ordered sequence of samples for one metric (oldest first).
pub type MetricSeries = Vec<f64>;

/// One time step of historical observations.
///
/// Serialized as a flat object: `{"date": "2024-01-01", "temperature": 20.1, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub values: MetricValues,
}

impl HistoricalRecord {
    pub fn new(values: MetricValues) -> Self {
        Self { date: None, values }
    }

    pub fn with_date(date: NaiveDate, values: MetricValues) -> Self {
        Self {
            date: Some(date),
            values,
        }
    }
}

/// Extract the series for `metric` in record order, skipping records that
/// do not carry it.
pub fn series(records: &[HistoricalRecord], metric: Metric) -> MetricSeries {
    records.iter().filter_map(|r| r.values.get(metric)).collect()
}

/// Whether any record carries `metric`.
pub fn has_metric(records: &[HistoricalRecord], metric: Metric) -> bool {
    records.iter().any(|r| r.values.contains(metric))
}

/// Reject empty history and samples that are NaN or infinite.
pub fn check_history(records: &[HistoricalRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(EnvSafeError::EmptyHistory);
    }
    for (index, record) in records.iter().enumerate() {
        if let Some((key, value)) = record.values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EnvSafeError::InvalidValue {
                field: key.to_string(),
                reason: format!("record {index} holds non-finite sample {value}"),
            });
        }
    }
    Ok(())
}
