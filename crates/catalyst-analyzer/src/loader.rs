use catalyst_models::RejectedRecord;
use catalyst_pipeline::Journal;
use chrono::{DateTime, Utc};

use crate::error::AnalyzerError;

/// Loads rejected items from the journal within a lookback window (spec.md
/// §4.J step 1). Reads a snapshot; never mutates `rejected_items.jsonl`.
pub fn load_rejected_within_window(
    journal: &Journal,
    now: DateTime<Utc>,
    lookback_days: u32,
) -> Result<Vec<RejectedRecord>, AnalyzerError> {
    let cutoff = now - chrono::Duration::days(lookback_days as i64);
    let records: Vec<RejectedRecord> = journal.snapshot()?;
    Ok(records
        .into_iter()
        .filter(|r| r.rejected_at >= cutoff)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_models::RejectionReason;

    fn record(rejected_at: DateTime<Utc>) -> RejectedRecord {
        RejectedRecord {
            schema: RejectedRecord::current_schema(),
            ts_published: rejected_at,
            ts_observed: rejected_at,
            source_id: "pr_wire".to_string(),
            canonical_id: "abc".to_string(),
            tickers: vec!["XYZ".to_string()],
            title: "t".to_string(),
            link: "l".to_string(),
            cls: None,
            reason: RejectionReason::BelowMinScore,
            rejected_at,
        }
    }

    #[test]
    fn filters_out_records_older_than_lookback() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path().join("rejected_items.jsonl")).unwrap();
        journal.append(&record(Utc::now())).unwrap();
        journal.append(&record(Utc::now() - chrono::Duration::days(60))).unwrap();

        let results = load_rejected_within_window(&journal, Utc::now(), 30).unwrap();
        assert_eq!(results.len(), 1);
    }
}
