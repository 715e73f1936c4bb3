//! Free-text recommendations derived from trends, current readings and
//! predicted safety scores.

use envsafe_core::{Metric, MetricValues, ScoringParams};

use crate::trajectory::CriticalTrend;

/// One intervention per critical trend, in the order the trends were flagged.
pub fn interventions(critical: &[CriticalTrend]) -> Vec<String> {
    critical
        .iter()
        .filter_map(|trend| match trend.metric {
            Metric::Temperature => Some("Implement urban cooling strategies and green infrastructure"),
            Metric::AirQuality => Some("Strengthen air pollution controls and promote clean energy"),
            Metric::Deforestation => {
                Some("Establish forest protection programs and sustainable land use")
            }
            _ => None,
        })
        .map(str::to_string)
        .collect()
}

fn country_recommendation(country: &str) -> Option<&'static str> {
    match country {
        "BD" => Some("Focus on flood resilience and water management systems"),
        "BR" => Some("Prioritize Amazon rainforest conservation efforts"),
        _ => None,
    }
}

/// Recommendations for a regional assessment.
///
/// Current-condition checks come first, then checks on the predicted
/// scores, then country-specific advice.
pub fn safety_recommendations(
    current: &MetricValues,
    predicted_scores: &[f64],
    country: &str,
    params: &ScoringParams,
) -> Vec<String> {
    let t = &params.recommendations;
    let mut recommendations = Vec::new();

    if current
        .get(Metric::AirQuality)
        .is_some_and(|aq| aq > t.air_quality_advisory)
    {
        recommendations
            .push("Implement immediate air quality monitoring and public health advisories".to_string());
    }

    if predicted_scores.iter().any(|&s| s < t.resilience_score) {
        recommendations.push("Develop long-term environmental resilience strategies".to_string());
    }

    if let Some(advice) = country_recommendation(country) {
        recommendations.push(advice.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrendSeverity;

    fn critical(metric: Metric) -> CriticalTrend {
        CriticalTrend {
            metric,
            issue: String::new(),
            severity: TrendSeverity::High,
            rate: 1.0,
        }
    }

    #[test]
    fn one_intervention_per_flagged_metric() {
        let out = interventions(&[critical(Metric::Deforestation), critical(Metric::Temperature)]);
        assert_eq!(
            out,
            vec![
                "Establish forest protection programs and sustainable land use",
                "Implement urban cooling strategies and green infrastructure",
            ]
        );
        assert!(interventions(&[]).is_empty());
    }

    #[test]
    fn recommendations_follow_fixed_order() {
        let current: MetricValues = [("air_quality", 160.0)].into_iter().collect();
        let out = safety_recommendations(&current, &[72.0, 49.9], "BD", &ScoringParams::default());
        assert_eq!(
            out,
            vec![
                "Implement immediate air quality monitoring and public health advisories",
                "Develop long-term environmental resilience strategies",
                "Focus on flood resilience and water management systems",
            ]
        );
    }

    #[test]
    fn quiet_region_gets_only_country_advice() {
        let current: MetricValues = [("air_quality", 40.0)].into_iter().collect();
        let params = ScoringParams::default();
        assert_eq!(
            safety_recommendations(&current, &[75.0, 70.0], "BR", &params),
            vec!["Prioritize Amazon rainforest conservation efforts"]
        );
        assert!(safety_recommendations(&current, &[75.0], "FR", &params).is_empty());
    }
}
