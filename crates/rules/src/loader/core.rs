//! Core [`RuleLoader`] struct: filesystem-backed loading into a [`RuleSet`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use envsafe_core::EngineSettings;

use crate::forecast_config::ForecastConfigRule;
use crate::schema::{RuleDocument, RuleEnvelope};
use crate::scoring_config::ScoringConfigRule;
use crate::trend_config::TrendConfigRule;

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// At most one enabled document per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub forecast: Option<ForecastConfigRule>,
    pub scoring: Option<ScoringConfigRule>,
    pub trend: Option<TrendConfigRule>,
}

impl RuleSet {
    /// Compile into engine settings; kinds without a document keep the built-in values.
    pub fn compile(&self) -> EngineSettings {
        EngineSettings {
            forecast: self
                .forecast
                .as_ref()
                .map(ForecastConfigRule::compile)
                .unwrap_or_default(),
            scoring: self
                .scoring
                .as_ref()
                .map(ScoringConfigRule::compile)
                .unwrap_or_default(),
            trend: self
                .trend
                .as_ref()
                .map(TrendConfigRule::compile)
                .unwrap_or_default(),
        }
    }

    /// Slot the document in, rejecting a second document of the same kind.
    fn insert(&mut self, doc: RuleDocument) -> Result<()> {
        let kind = doc.kind();
        let inserted = match doc {
            RuleDocument::Forecast(rule) => fill(&mut self.forecast, rule),
            RuleDocument::Scoring(rule) => fill(&mut self.scoring, rule),
            RuleDocument::Trend(rule) => fill(&mut self.trend, rule),
        };
        if !inserted {
            return Err(RuleError::Validation(format!(
                "more than one enabled {} document",
                kind
            )));
        }
        Ok(())
    }
}

/// Store `rule` unless the slot is already occupied; the first document wins.
fn fill<T>(slot: &mut Option<T>, rule: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(rule);
    true
}

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively, in path order) for `*.yml` / `*.yaml`
/// files. Parse errors are reported per-file but do not abort the scan.
pub struct RuleLoader {
    /// Root directory containing rule YAML files.
    rules_dir: PathBuf,
    rule_set: RuleSet,
}

impl RuleLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            rule_set: RuleSet::default(),
        }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn into_rule_set(self) -> RuleSet {
        self.rule_set
    }

    /// Scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. A missing directory yields
    /// no results and leaves the built-in defaults in place.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        if !self.rules_dir.exists() {
            warn!(path = %self.rules_dir.display(), "rules directory not found, using built-in parameters");
            return Ok(results);
        }
        let dir = self.rules_dir.clone();
        self.scan_dir_recursive(&dir, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut paths = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let status = match self.load_file(&path) {
                Ok(doc) if !doc.metadata().enabled => LoadStatus::Skipped {
                    reason: "disabled".to_string(),
                },
                Ok(doc) => {
                    let rule_id = doc.metadata().id.clone();
                    let kind = doc.kind();
                    match self.rule_set.insert(doc) {
                        Ok(()) => {
                            info!(rule_id = %rule_id, kind = %kind, path = %path.display(), "loaded rule");
                            LoadStatus::Loaded { rule_id }
                        }
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "rejected rule file");
                            LoadStatus::Failed {
                                error: e.to_string(),
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    LoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.push(LoadResult { path, status });
        }

        Ok(())
    }

    /// Parse and validate a single YAML file.
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;

        // First pass: extract envelope (kind + metadata).
        let envelope: RuleEnvelope = serde_yaml::from_str(&contents)?;

        if envelope.metadata.id.is_empty() {
            return Err(RuleError::Validation(
                "rule metadata.id must not be empty".to_string(),
            ));
        }

        // Second pass: deserialize into kind-specific type.
        let doc = envelope.parse_full().map_err(|e| {
            RuleError::Validation(format!(
                "failed to parse rule '{}': {}",
                envelope.metadata.id, e
            ))
        })?;

        doc.validate().map_err(|e| {
            RuleError::Validation(format!("rule '{}': {}", envelope.metadata.id, e))
        })?;

        Ok(doc)
    }
}

/// Load every document under `dir` and return the resulting rule set with
/// the per-file outcomes.
pub fn load_rules_dir(dir: impl Into<PathBuf>) -> Result<(RuleSet, Vec<LoadResult>)> {
    let mut loader = RuleLoader::new(dir.into());
    let results = loader.load_all()?;
    Ok((loader.into_rule_set(), results))
}
