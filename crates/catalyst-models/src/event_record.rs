use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rejection::RejectionReason;
use crate::scored_item::{FloatClass, OfferingSeverity, Regime};

/// Current schema tag stamped on every journal line. Bump when the shape of
/// `AcceptedRecord`/`RejectedRecord` changes incompatibly.
pub const JOURNAL_SCHEMA_VERSION: &str = "v1";

/// The classification block embedded in journal records (spec.md §6
/// `events.jsonl` `cls` object).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationSummary {
    pub keyword_score: f64,
    pub sentiment_score: f64,
    pub source_weight: f64,
    pub relevance: f64,
    pub regime: Regime,
    pub float_class: Option<FloatClass>,
    pub offering_severity: OfferingSeverity,
    pub confidence: f64,
}

/// One line of `events.jsonl`: an item that passed Filter & Admission and was
/// dispatched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcceptedRecord {
    pub schema: String,
    pub ts_published: DateTime<Utc>,
    pub ts_observed: DateTime<Utc>,
    pub source_id: String,
    pub canonical_id: String,
    pub tickers: Vec<String>,
    pub title: String,
    pub link: String,
    pub cls: ClassificationSummary,
    pub dispatched_at: DateTime<Utc>,
}

/// One line of `rejected_items.jsonl`: an item that failed admission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedRecord {
    pub schema: String,
    pub ts_published: DateTime<Utc>,
    pub ts_observed: DateTime<Utc>,
    pub source_id: String,
    pub canonical_id: String,
    pub tickers: Vec<String>,
    pub title: String,
    pub link: String,
    pub cls: Option<ClassificationSummary>,
    pub reason: RejectionReason,
    pub rejected_at: DateTime<Utc>,
}

impl AcceptedRecord {
    pub fn current_schema() -> String {
        JOURNAL_SCHEMA_VERSION.to_string()
    }
}

impl RejectedRecord {
    pub fn current_schema() -> String {
        JOURNAL_SCHEMA_VERSION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cls() -> ClassificationSummary {
        ClassificationSummary {
            keyword_score: 0.6,
            sentiment_score: 0.2,
            source_weight: 0.7,
            relevance: 0.5,
            regime: Regime::Neutral,
            float_class: Some(FloatClass::Micro),
            offering_severity: OfferingSeverity::None,
            confidence: 0.75,
        }
    }

    #[test]
    fn accepted_record_roundtrips_and_stamps_schema() {
        let rec = AcceptedRecord {
            schema: AcceptedRecord::current_schema(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            source_id: "pr_wire".to_string(),
            canonical_id: "abc123".to_string(),
            tickers: vec!["XYZ".to_string()],
            title: "XYZ Announces Pivotal Data".to_string(),
            link: "https://example.com/x".to_string(),
            cls: cls(),
            dispatched_at: Utc::now(),
        };
        assert_eq!(rec.schema, "v1");
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: AcceptedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, parsed);
    }

    #[test]
    fn rejected_record_allows_missing_classification() {
        let rec = RejectedRecord {
            schema: RejectedRecord::current_schema(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            source_id: "sec_8k".to_string(),
            canonical_id: "acc1".to_string(),
            tickers: vec![],
            title: "t".to_string(),
            link: "l".to_string(),
            cls: None,
            reason: RejectionReason::ClassifierError,
            rejected_at: Utc::now(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: RejectedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, parsed);
        assert!(parsed.cls.is_none());
    }
}
