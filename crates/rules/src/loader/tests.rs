//! Tests for the rule loader module.

use std::fs;

use tempfile::TempDir;

use envsafe_core::{Bounds, Metric};

use super::*;
use crate::schema::RuleKind;

const TREND_YAML: &str = r#"
apiVersion: v1
kind: TrendConfig
metadata:
  id: trend-strict
  name: Strict Trends
  enabled: true
spec:
  trajectory_ratio: 2.0
"#;

const SCORING_YAML: &str = r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: scoring-lenient
  name: Lenient Decay
spec:
  time_decay: { per_month: 0.005, floor: 0.8 }
"#;

fn temp_loader() -> (TempDir, RuleLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = RuleLoader::new(dir.path().to_path_buf());
    (dir, loader)
}

fn loaded_ids(results: &[LoadResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Loaded { rule_id } => Some(rule_id.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn load_rule_from_file() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("trend.yml");
    fs::write(&path, TREND_YAML).unwrap();

    let doc = loader.load_file(&path).unwrap();
    assert_eq!(doc.kind(), RuleKind::TrendConfig);
    assert_eq!(doc.metadata().name, "Strict Trends");
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("trend.yml"), TREND_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), SCORING_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule").unwrap();

    let results = loader.load_all().unwrap();

    assert_eq!(loaded_ids(&results), vec!["trend-strict"]);
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(skipped, 2);
    assert!(loader.rule_set().scoring.is_none());
}

#[test]
fn subdirectories_are_scanned() {
    let (dir, mut loader) = temp_loader();
    let nested = dir.path().join("overrides");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("scoring.yaml"), SCORING_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["scoring-lenient"]);
}

#[test]
fn compile_merges_documents_with_defaults() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("scoring.yml"), SCORING_YAML).unwrap();
    fs::write(dir.path().join("trend.yml"), TREND_YAML).unwrap();
    loader.load_all().unwrap();

    let settings = loader.rule_set().compile();
    assert_eq!(settings.scoring.time_decay.floor, 0.8);
    assert_eq!(settings.trend.trajectory_ratio, 2.0);
    assert_eq!(settings.forecast, envsafe_core::ForecastParams::default());
}

#[test]
fn duplicate_kind_keeps_first_and_reports_second() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("a-trend.yml"), TREND_YAML).unwrap();
    fs::write(
        dir.path().join("b-trend.yml"),
        TREND_YAML.replace("trend-strict", "trend-other"),
    )
    .unwrap();

    let results = loader.load_all().unwrap();

    assert_eq!(loaded_ids(&results), vec!["trend-strict"]);
    let failed: Vec<_> = results.iter().filter(|r| r.is_failed()).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].path.ends_with("b-trend.yml"));
    assert_eq!(
        loader.rule_set().trend.as_ref().unwrap().metadata.id,
        "trend-strict"
    );
}

#[test]
fn disabled_documents_are_skipped() {
    let (dir, mut loader) = temp_loader();
    fs::write(
        dir.path().join("trend.yml"),
        TREND_YAML.replace("enabled: true", "enabled: false"),
    )
    .unwrap();

    let results = loader.load_all().unwrap();
    assert!(loaded_ids(&results).is_empty());
    assert_eq!(loader.rule_set(), &RuleSet::default());
}

#[test]
fn invalid_document_is_reported_not_fatal() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("broken.yml"), "apiVersion: v1\nkind: [").unwrap();
    fs::write(dir.path().join("trend.yml"), TREND_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 1);
    assert_eq!(loaded_ids(&results), vec!["trend-strict"]);
}

#[test]
fn missing_directory_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let (rule_set, results) = load_rules_dir(dir.path().join("absent")).unwrap();
    assert!(results.is_empty());
    assert_eq!(rule_set.compile(), envsafe_core::EngineSettings::default());
}

#[test]
fn partial_tables_merge_over_builtin_entries() {
    let (dir, mut loader) = temp_loader();
    fs::write(
        dir.path().join("forecast.yml"),
        r#"
apiVersion: v1
kind: ForecastConfig
metadata:
  id: forecast-humid
  name: Humid Cap
spec:
  bounds:
    humidity: { min: 0.0, max: 90.0 }
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("scoring.yml"),
        r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: scoring-air
  name: Air Weight
spec:
  weights:
    air_quality: 0.20
"#,
    )
    .unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(loaded_ids(&results), vec!["forecast-humid", "scoring-air"]);

    let settings = loader.rule_set().compile();
    let defaults = envsafe_core::EngineSettings::default();
    assert_eq!(
        settings.forecast.bounds_for(Metric::Humidity),
        Some(Bounds::new(0.0, 90.0))
    );
    for metric in Metric::ALL.into_iter().filter(|m| *m != Metric::Humidity) {
        assert_eq!(
            settings.forecast.bounds_for(metric),
            defaults.forecast.bounds_for(metric),
            "{metric}"
        );
    }
    assert_eq!(settings.forecast.clamp(Some(Metric::Temperature), 200.0), 60.0);

    assert_eq!(settings.scoring.weight(Metric::AirQuality), Some(0.20));
    for metric in [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Deforestation,
        Metric::CarbonEmission,
        Metric::WaterQuality,
    ] {
        assert_eq!(settings.scoring.weight(metric), defaults.scoring.weight(metric));
    }
    assert_eq!(settings.scoring.defaults, defaults.scoring.defaults);
}

#[test]
fn overweight_scoring_document_is_rejected() {
    let (dir, mut loader) = temp_loader();
    fs::write(
        dir.path().join("scoring.yml"),
        SCORING_YAML.replace(
            "  time_decay: { per_month: 0.005, floor: 0.8 }",
            "  weights:\n    air_quality: 0.30",
        ),
    )
    .unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 1);
    assert!(loader.rule_set().scoring.is_none());
}
