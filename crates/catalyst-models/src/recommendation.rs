use serde::{Deserialize, Serialize};

/// Kind of keyword-weight change recommended by the nightly analyzer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    New,
    WeightIncrease,
    WeightDecrease,
    NewDiscovered,
}

/// Statistical evidence backing a `KeywordRecommendation` (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub occurrences: u64,
    pub successes: u64,
    pub success_rate: f64,
    pub lift: f64,
    pub sample_size: u64,
    pub p_value: f64,
}

/// A single nightly keyword-weight recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordRecommendation {
    pub keyword: String,
    pub kind: RecommendationKind,
    pub recommended_weight: f64,
    pub confidence: f64,
    pub evidence: Evidence,
}

/// Write-once output of an analyzer run (spec.md §3 "superseding prior
/// outputs atomically").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub lookback_days: u32,
    pub items_considered: u64,
    pub missed_opportunities: u64,
    pub recommendations: Vec<KeywordRecommendation>,
}

impl RecommendationReport {
    pub fn empty(lookback_days: u32, generated_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            generated_at,
            lookback_days,
            items_considered: 0,
            missed_opportunities: 0,
            recommendations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_report_has_no_recommendations() {
        let report = RecommendationReport::empty(30, Utc::now());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.items_considered, 0);
    }

    #[test]
    fn roundtrip_recommendation() {
        let rec = KeywordRecommendation {
            keyword: "pivotal Phase 3 results".to_string(),
            kind: RecommendationKind::New,
            recommended_weight: 0.5,
            confidence: 0.7,
            evidence: Evidence {
                occurrences: 12,
                successes: 9,
                success_rate: 0.75,
                lift: 2.4,
                sample_size: 200,
                p_value: 0.01,
            },
        };
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: KeywordRecommendation = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, parsed);
    }
}
