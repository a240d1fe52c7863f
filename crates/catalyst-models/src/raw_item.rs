use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default tolerance for `ts_observed` preceding `ts_published` — clock skew
/// between a feed's publish timestamp and our observation of it.
pub const CLOCK_SKEW_TOLERANCE_SECONDS: i64 = 60;

/// Output of a feed fetcher; input to the classifier.
///
/// Uniqueness key is `(source_id, canonical_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawItem {
    pub source_id: String,
    pub canonical_id: String,
    pub ts_published: DateTime<Utc>,
    pub ts_observed: DateTime<Utc>,
    pub title: String,
    pub body_snippet: Option<String>,
    pub link: String,
    /// Pre-extracted symbols from the feed, if any.
    pub tickers_hint: Vec<String>,
}

impl RawItem {
    /// True when `ts_observed` is not implausibly before `ts_published`.
    pub fn respects_clock_skew(&self) -> bool {
        let tolerance = chrono::Duration::seconds(CLOCK_SKEW_TOLERANCE_SECONDS);
        self.ts_observed >= self.ts_published - tolerance
    }

    pub fn age(&self) -> chrono::Duration {
        self.ts_observed - self.ts_published
    }

    pub fn dedup_key(&self) -> (String, String) {
        (self.source_id.clone(), self.canonical_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(ts_published: DateTime<Utc>, ts_observed: DateTime<Utc>) -> RawItem {
        RawItem {
            source_id: "sec_8k".to_string(),
            canonical_id: "acc1".to_string(),
            ts_published,
            ts_observed,
            title: "Company X announces FDA approval".to_string(),
            body_snippet: None,
            link: "https://example.com/filing".to_string(),
            tickers_hint: vec!["XYZ".to_string()],
        }
    }

    #[test]
    fn within_skew_tolerance_passes() {
        let now = Utc::now();
        let raw = item(now, now - Duration::seconds(60));
        assert!(raw.respects_clock_skew());
    }

    #[test]
    fn beyond_skew_tolerance_fails() {
        let now = Utc::now();
        let raw = item(now, now - Duration::seconds(61));
        assert!(!raw.respects_clock_skew());
    }

    #[test]
    fn dedup_key_pairs_source_and_canonical_id() {
        let now = Utc::now();
        let raw = item(now, now);
        assert_eq!(
            raw.dedup_key(),
            ("sec_8k".to_string(), "acc1".to_string())
        );
    }
}
