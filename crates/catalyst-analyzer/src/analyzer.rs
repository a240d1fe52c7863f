use std::collections::HashMap;
use std::path::{Path, PathBuf};

use catalyst_cache::MarketDataCache;
use catalyst_models::{AnalyzerConfig, Outcome, RecommendationReport};
use catalyst_pipeline::Journal;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AnalyzerError;
use crate::loader::load_rejected_within_window;
use crate::mining::mine_phrases;
use crate::outcomes::compute_outcomes;
use crate::recommend::recommend_for_phrase;
use crate::stats::{benjamini_hochberg, proportion_z_test};

/// Historical Analyzer (spec.md §4.J): replays rejected items against
/// realized market outcomes, mines keyword phrases correlated with missed
/// opportunities, and emits a `RecommendationReport`. Runs on a nightly
/// wall-clock trigger, is idempotent (re-running over the same window
/// reproduces the same report modulo statistical resampling noise), and
/// never mutates the journals it reads from.
pub struct Analyzer<'a> {
    cache: &'a MarketDataCache,
    rejected_journal: &'a Journal,
    config: &'a AnalyzerConfig,
    output_path: PathBuf,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        cache: &'a MarketDataCache,
        rejected_journal: &'a Journal,
        config: &'a AnalyzerConfig,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache,
            rejected_journal,
            config,
            output_path: output_path.into(),
        }
    }

    pub async fn run(
        &self,
        now: DateTime<Utc>,
        current_weights: &HashMap<String, f64>,
    ) -> Result<RecommendationReport, AnalyzerError> {
        let rejected = load_rejected_within_window(self.rejected_journal, now, self.config.lookback_days)?;
        info!(count = rejected.len(), "loaded rejected items for analysis");

        let mut all_outcomes: Vec<Outcome> = Vec::new();
        let mut titled: Vec<(String, bool)> = Vec::new();

        for record in &rejected {
            let Some(ticker) = record.tickers.first() else {
                continue;
            };
            match compute_outcomes(self.cache, record, ticker, self.config).await {
                Ok(outcomes) => {
                    let missed = outcomes.iter().any(|o| o.is_missed_opportunity);
                    titled.push((record.title.clone(), missed));
                    all_outcomes.extend(outcomes);
                }
                Err(err) => {
                    info!(canonical_id = %record.canonical_id, error = %err, "skipping item with unresolvable outcome");
                }
            }
        }

        let titled_refs: Vec<(&str, bool)> = titled.iter().map(|(t, m)| (t.as_str(), *m)).collect();
        let phrases = mine_phrases(&titled_refs);

        let baseline_rate = if titled.is_empty() {
            0.0
        } else {
            titled.iter().filter(|(_, m)| *m).count() as f64 / titled.len() as f64
        };

        let mut p_values = Vec::with_capacity(phrases.len());
        for phrase in &phrases {
            let p = proportion_z_test(phrase.missed_occurrences, phrase.occurrences, baseline_rate)
                .unwrap_or(1.0);
            p_values.push(p);
        }
        let significant_indices = benjamini_hochberg(&p_values, self.config.fdr_alpha);

        let recommendations = significant_indices
            .into_iter()
            .map(|i| {
                let phrase = &phrases[i];
                let current = current_weights.get(&phrase.phrase).copied();
                recommend_for_phrase(phrase, current, p_values[i])
            })
            .collect();

        let missed_opportunities = all_outcomes.iter().filter(|o| o.is_missed_opportunity).count() as u64;
        let report = RecommendationReport {
            generated_at: now,
            lookback_days: self.config.lookback_days,
            items_considered: rejected.len() as u64,
            missed_opportunities,
            recommendations,
        };

        self.write_report_atomically(&report)?;
        Ok(report)
    }

    fn write_report_atomically(&self, report: &RecommendationReport) -> Result<(), AnalyzerError> {
        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AnalyzerError::Stats(e.to_string()))?;
        }
        let tmp = self.output_path.with_extension("tmp");
        let bytes = serde_json::to_vec_pretty(report).map_err(|e| AnalyzerError::Stats(e.to_string()))?;
        std::fs::write(&tmp, bytes).map_err(|e| AnalyzerError::Stats(e.to_string()))?;
        std::fs::rename(&tmp, &self.output_path).map_err(|e| AnalyzerError::Stats(e.to_string()))?;
        Ok(())
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
