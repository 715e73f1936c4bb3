mod cli;
mod synthetic;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use envsafe_compute::{Predictor, TrainingOutcome};
use envsafe_core::config::load_dotenv;
use envsafe_core::{Config, HistoricalRecord, MetricValues};
use envsafe_rules::{load_rules_dir, LoadStatus};

use crate::cli::{CliArgs, Command, CurrentArgs, HistoryArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = Config::from_env();
    config.log_summary();

    let predictor = build_predictor(&args, &config)?;

    match &args.command {
        Command::Train { history } => {
            let history = load_history(history, &args, &config)?;
            let outcome = train(&predictor, &history)?;
            print_json(&outcome, args.compact)
        }
        Command::Forecast {
            history,
            current,
            months,
        } => {
            let history = load_history(history, &args, &config)?;
            let outcome = train(&predictor, &history)?;
            let values = load_current(current)?;
            let country = country(current, &config);
            let horizon = months.unwrap_or(config.forecast.horizon_months);

            let predictions = predictor.forecast(&outcome.registry, &values, &country, horizon);
            print_json(&predictions, args.compact)
        }
        Command::Analyze { history } => {
            let history = load_history(history, &args, &config)?;
            let analysis = predictor
                .analyze_trends(&history)
                .context("trend analysis failed")?;
            print_json(&analysis, args.compact)
        }
        Command::Assess { history, current } => {
            let history = load_history(history, &args, &config)?;
            let outcome = train(&predictor, &history)?;
            let values = load_current(current)?;
            let country = country(current, &config);

            let assessment = predictor.assess_regional_safety(&outcome.registry, &values, &country);
            print_json(&assessment, args.compact)
        }
    }
}

/// Compile engine parameters from the rules directory, defaults for anything missing.
fn build_predictor(args: &CliArgs, config: &Config) -> Result<Predictor> {
    let dir = args.rules_dir.as_ref().unwrap_or(&config.rules.dir);
    let (rule_set, results) = load_rules_dir(dir)
        .with_context(|| format!("failed to load rules from {}", dir.display()))?;

    for result in &results {
        match &result.status {
            LoadStatus::Loaded { rule_id } => {
                info!(rule_id = %rule_id, path = %result.path.display(), "rule loaded")
            }
            LoadStatus::Failed { error } => {
                warn!(path = %result.path.display(), error = %error, "rule rejected")
            }
            LoadStatus::Skipped { .. } => {}
        }
    }

    Ok(Predictor::new(rule_set.compile()))
}

fn load_history(source: &HistoryArgs, args: &CliArgs, config: &Config) -> Result<Vec<HistoricalRecord>> {
    if let Some(path) = &source.history {
        return read_json(path);
    }

    let months = args.synthetic_months.unwrap_or(config.synthetic.months);
    let seed = args.seed.or(config.synthetic.seed);
    info!(months, ?seed, "generating synthetic history");
    Ok(synthetic::generate(months, seed, Local::now().date_naive()))
}

fn train(predictor: &Predictor, history: &[HistoricalRecord]) -> Result<TrainingOutcome> {
    predictor
        .train(history)
        .context("training requires at least one historical record")
}

/// Readings from `--current`, then each `--value` in order.
fn load_current(source: &CurrentArgs) -> Result<MetricValues> {
    let mut values: MetricValues = match &source.current {
        Some(path) => read_json(path)?,
        None => MetricValues::new(),
    };
    for (name, value) in &source.values {
        values.insert(name.as_str(), *value);
    }
    if values.is_empty() {
        warn!("no current readings supplied; forecasts will contain only default-based scores");
    }
    Ok(values)
}

fn country(source: &CurrentArgs, config: &Config) -> String {
    source
        .country
        .clone()
        .unwrap_or_else(|| config.forecast.default_country.clone())
        .to_uppercase()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}
