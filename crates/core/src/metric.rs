use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The seven environmental indicators the engine knows how to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    AirQuality,
    Deforestation,
    CarbonEmission,
    WaterQuality,
    Biodiversity,
}

impl Metric {
    /// Canonical order used for training and trend analysis.
    pub const ALL: [Metric; 7] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::AirQuality,
        Metric::Deforestation,
        Metric::CarbonEmission,
        Metric::WaterQuality,
        Metric::Biodiversity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::AirQuality => "air_quality",
            Metric::Deforestation => "deforestation",
            Metric::CarbonEmission => "carbon_emission",
            Metric::WaterQuality => "water_quality",
            Metric::Biodiversity => "biodiversity",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not one of the seven known metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric: {}", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// Key of a metric value as supplied by a caller.
///
/// Names outside the closed enumeration are kept verbatim as `Other` and
/// take the fallback path everywhere: no trend model, no bounds, no
/// country factor, zero fallback rate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKey {
    Known(Metric),
    Other(String),
}

impl MetricKey {
    pub fn metric(&self) -> Option<Metric> {
        match self {
            MetricKey::Known(m) => Some(*m),
            MetricKey::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MetricKey::Known(m) => m.as_str(),
            MetricKey::Other(name) => name.as_str(),
        }
    }
}

impl From<Metric> for MetricKey {
    fn from(metric: Metric) -> Self {
        MetricKey::Known(metric)
    }
}

impl From<&str> for MetricKey {
    fn from(name: &str) -> Self {
        match name.parse::<Metric>() {
            Ok(m) => MetricKey::Known(m),
            Err(_) => MetricKey::Other(name.to_string()),
        }
    }
}

impl From<String> for MetricKey {
    fn from(name: String) -> Self {
        match name.parse::<Metric>() {
            Ok(m) => MetricKey::Known(m),
            Err(_) => MetricKey::Other(name),
        }
    }
}

impl From<MetricKey> for String {
    fn from(key: MetricKey) -> Self {
        match key {
            MetricKey::Known(m) => m.as_str().to_string(),
            MetricKey::Other(name) => name,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metric values in caller insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricValues(IndexMap<MetricKey, f64>);

impl MetricValues {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<MetricKey>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&MetricKey::Known(metric)).copied()
    }

    /// Value for `metric`, or `default` when the caller did not supply it.
    pub fn get_or(&self, metric: Metric, default: f64) -> f64 {
        self.get(metric).unwrap_or(default)
    }

    pub fn get_key(&self, key: &MetricKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(&MetricKey::Known(metric))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricKey, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<MetricKey>> FromIterator<(K, f64)> for MetricValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
