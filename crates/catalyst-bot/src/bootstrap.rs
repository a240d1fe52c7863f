use std::sync::Arc;

use anyhow::Result;
use catalyst_cache::MarketDataCache;
use catalyst_feeds::FetcherRegistry;
use catalyst_models::{RawItem, RejectedRecord, RejectionReason};
use catalyst_pipeline::Journal;
use chrono::{DateTime, Utc};
use tracing::info;

/// Batch-seeds the dedup/journal state from a historical window of feed
/// items, so a freshly deployed bot's analyzer has something to mine on
/// its first nightly run instead of waiting weeks for organic rejections
/// (spec.md §6 CLI surface, `bootstrap` subcommand).
pub async fn run_bootstrap(
    registry: &mut FetcherRegistry,
    _cache: Arc<MarketDataCache>,
    rejected_journal: &Journal,
    since: DateTime<Utc>,
) -> Result<u64> {
    let outcomes = registry.fetch_all(since).await;
    let mut seeded = 0u64;

    for outcome in outcomes {
        for item in outcome.items {
            let record = raw_item_to_placeholder_rejection(&item);
            rejected_journal.append(&record)?;
            seeded += 1;
        }
    }

    info!(seeded, "bootstrap seeding complete");
    Ok(seeded)
}

/// Bootstrap doesn't run the live classifier (no enrichment snapshot
/// exists for historical timestamps), so seeded records carry no
/// classification and a dedicated `Stale` reason marking them as
/// backfilled rather than organically rejected.
fn raw_item_to_placeholder_rejection(item: &RawItem) -> RejectedRecord {
    RejectedRecord {
        schema: RejectedRecord::current_schema(),
        ts_published: item.ts_published,
        ts_observed: item.ts_observed,
        source_id: item.source_id.clone(),
        canonical_id: item.canonical_id.clone(),
        tickers: item.tickers_hint.clone(),
        title: item.title.clone(),
        link: item.link.clone(),
        cls: None,
        reason: RejectionReason::Stale,
        rejected_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_rejection_carries_no_classification() {
        let item = RawItem {
            source_id: "pr_wire".to_string(),
            canonical_id: "abc".to_string(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            title: "t".to_string(),
            body_snippet: None,
            link: "l".to_string(),
            tickers_hint: vec![],
        };
        let record = raw_item_to_placeholder_rejection(&item);
        assert!(record.cls.is_none());
        assert_eq!(record.reason, RejectionReason::Stale);
    }
}
