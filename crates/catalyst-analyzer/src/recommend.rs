use catalyst_models::{Evidence, KeywordRecommendation, RecommendationKind};

use crate::mining::PhraseStats;

const NEW_KEYWORD_MIN_WEIGHT: f64 = 0.3;
const NEW_KEYWORD_MAX_WEIGHT: f64 = 0.8;
const EXISTING_KEYWORD_STEP: f64 = 0.1;

/// Turns a mined phrase's statistics into a concrete recommendation
/// (spec.md §4.J step 5). New keywords are seeded conservatively in
/// [0.3, 0.8] scaled by lift strength rather than jumping straight to 1.0;
/// existing keywords move by a fixed ±0.1 step so a single analyzer run
/// can't whiplash a keyword's weight.
pub fn recommend_for_phrase(
    stats: &PhraseStats,
    current_weight: Option<f64>,
    p_value: f64,
) -> KeywordRecommendation {
    let sample_size = stats.occurrences;
    let success_rate = stats.missed_occurrences as f64 / stats.occurrences.max(1) as f64;
    let evidence = Evidence {
        occurrences: stats.occurrences,
        successes: stats.missed_occurrences,
        success_rate,
        lift: stats.lift,
        sample_size,
        p_value,
    };

    match current_weight {
        None => {
            let lift_fraction = (stats.lift / 10.0).clamp(0.0, 1.0);
            let weight = NEW_KEYWORD_MIN_WEIGHT
                + lift_fraction * (NEW_KEYWORD_MAX_WEIGHT - NEW_KEYWORD_MIN_WEIGHT);
            KeywordRecommendation {
                keyword: stats.phrase.clone(),
                kind: RecommendationKind::New,
                recommended_weight: weight,
                confidence: (1.0 - p_value).clamp(0.0, 1.0),
                evidence,
            }
        }
        Some(existing) => {
            let (kind, weight) = if stats.lift >= 2.0 {
                (RecommendationKind::WeightIncrease, (existing + EXISTING_KEYWORD_STEP).min(1.0))
            } else {
                (RecommendationKind::WeightDecrease, (existing - EXISTING_KEYWORD_STEP).max(-1.0))
            };
            KeywordRecommendation {
                keyword: stats.phrase.clone(),
                kind,
                recommended_weight: weight,
                confidence: (1.0 - p_value).clamp(0.0, 1.0),
                evidence,
            }
        }
    }
}
