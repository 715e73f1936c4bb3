use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};

/// Environmental forecasting and safety scoring.
///
/// Trains per-metric trend models from historical readings on every run,
/// then forecasts, analyses or assesses against current conditions.
#[derive(Parser, Debug)]
#[command(name = "envsafe", about = "Environmental forecasting and safety scoring", version)]
pub struct CliArgs {
    /// Directory of YAML rule documents (overrides ENVSAFE_RULES_DIR)
    #[arg(long, global = true)]
    pub rules_dir: Option<PathBuf>,

    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Months of synthetic history (overrides ENVSAFE_SYNTHETIC_MONTHS)
    #[arg(long, global = true)]
    pub synthetic_months: Option<u32>,

    /// Seed for synthetic history (overrides ENVSAFE_SYNTHETIC_SEED)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fit trend models and print the registry with its training summary
    Train {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Forecast month-by-month conditions for a country
    Forecast {
        #[command(flatten)]
        history: HistoryArgs,

        #[command(flatten)]
        current: CurrentArgs,

        /// Number of monthly steps (overrides ENVSAFE_HORIZON_MONTHS)
        #[arg(long)]
        months: Option<u32>,
    },

    /// Summarize historical trends and flag critical ones
    Analyze {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Assess current and long-range safety for a country
    Assess {
        #[command(flatten)]
        history: HistoryArgs,

        #[command(flatten)]
        current: CurrentArgs,
    },
}

/// Where historical records come from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct HistoryArgs {
    /// JSON file holding an array of historical records
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Generate synthetic monthly history instead of reading a file
    #[arg(long)]
    pub synthetic: bool,
}

/// Current readings for forecast and assessment.
#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// JSON file holding an object of metric name to value
    #[arg(long)]
    pub current: Option<PathBuf>,

    /// A single reading as name=value; repeatable, overrides --current
    #[arg(long = "value", value_parser = parse_metric_value)]
    pub values: Vec<(String, f64)>,

    /// ISO country code (overrides ENVSAFE_DEFAULT_COUNTRY)
    #[arg(long)]
    pub country: Option<String>,
}

/// Parse `name=value` into a metric name and number.
pub fn parse_metric_value(raw: &str) -> anyhow::Result<(String, f64)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("metric name is empty in '{raw}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid number for {name}"))?;
    if !value.is_finite() {
        return Err(anyhow!("value for {name} must be finite"));
    }
    Ok((name.to_string(), value))
}
